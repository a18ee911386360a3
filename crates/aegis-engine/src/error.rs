//! Engine errors
//!
//! Only configuration mistakes, storage failures, and `enforce` denials are
//! errors; an ordinary "no" from `check_access` is a normal result.

use aegis_store::StoreError;

/// Errors raised by [`AccessControlEngine`](crate::AccessControlEngine)
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A grant referenced a role the engine does not know
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Attempted to overwrite or delete a built-in system role
    #[error("system role is protected: {0}")]
    SystemRoleProtected(String),

    /// `enforce` was called and access was denied
    #[error("access denied for {principal_id} on {resource} ({action}): {reason}")]
    AccessDenied {
        /// Principal that was checked
        principal_id: String,
        /// Resource that was checked
        resource: String,
        /// Action that was checked
        action: String,
        /// Decision reason from the underlying check
        reason: String,
    },

    /// Persisting a mutation failed; in-memory state was left unchanged
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl EngineError {
    /// Check if this error is an access denial
    #[inline]
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}
