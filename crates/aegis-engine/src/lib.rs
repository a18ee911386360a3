//! AEGIS access-control engine
//!
//! Resolves whether a principal (user, service, API key) may perform an
//! action on a resource, given time-bounded, optionally-scoped role
//! assignments over a hierarchy of pattern-matched roles.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use aegis_engine::prelude::*;
//!
//! let engine = AccessControlEngine::in_memory();
//! engine.assign_role(Grant::new("u1", "developer"))?;
//!
//! let decision = engine.check_access("u1", "project/maestro/code/main.py", "read");
//! assert!(decision.allowed);
//!
//! engine.enforce("u1", "project/maestro/code/main.py", "delete")?; // AccessDenied
//! ```
//!
//! Denial is a normal result, not an error: `check_access` always returns a
//! populated [`AccessCheckResult`](aegis_model::AccessCheckResult), and only
//! [`AccessControlEngine::enforce`] turns a denial into an
//! [`EngineError::AccessDenied`].

pub mod builtin;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod grant;

pub use cache::CacheStats;
pub use config::EngineConfig;
pub use engine::{AccessControlEngine, AuditHook};
pub use error::EngineError;
pub use grant::Grant;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the access-control engine
    pub use crate::builtin;
    pub use crate::{AccessControlEngine, CacheStats, EngineConfig, EngineError, Grant};
    pub use aegis_model::{
        AccessCheckResult, AssignmentId, Permission, PrincipalKind, ResourcePattern, Role,
        RoleAssignment,
    };
    pub use aegis_store::{GrantStore, JsonDirStore, MemoryStore};
}
