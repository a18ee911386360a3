//! Persistence seam for the access-control engine
//!
//! The engine owns its in-memory tables; this crate owns how they survive a
//! process restart. [`GrantStore`] is the boundary trait, with two backends:
//!
//! - [`MemoryStore`] - volatile, for tests and embedded use
//! - [`JsonDirStore`] - one JSON file per custom role and per assignment
//!   under a storage directory
//!
//! Load paths are best-effort (corrupt files are logged and skipped so
//! startup never aborts on one bad record); save paths propagate errors,
//! since silently losing a grant or a revocation would be a security defect.

pub mod error;
pub mod json_dir;
pub mod memory;

pub use error::StoreError;
pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;

use aegis_model::{Role, RoleAssignment};

/// Durable storage for custom roles and role assignments
///
/// Implementations must be safe to call from multiple threads; the engine
/// serializes its own mutations but reads can happen concurrently.
pub trait GrantStore: Send + Sync {
    /// Persist a custom role, overwriting any previous version
    fn save_role(&self, role: &Role) -> Result<(), StoreError>;

    /// Remove a persisted role; returns false if it was not stored
    fn delete_role(&self, role_id: &str) -> Result<bool, StoreError>;

    /// Load every persisted custom role
    fn load_roles(&self) -> Result<Vec<Role>, StoreError>;

    /// Persist an assignment (including revoked ones), overwriting by id
    fn save_assignment(&self, assignment: &RoleAssignment) -> Result<(), StoreError>;

    /// Load every persisted assignment, revoked ones included
    fn load_assignments(&self) -> Result<Vec<RoleAssignment>, StoreError>;
}

impl<S: GrantStore + ?Sized> GrantStore for Box<S> {
    fn save_role(&self, role: &Role) -> Result<(), StoreError> {
        (**self).save_role(role)
    }

    fn delete_role(&self, role_id: &str) -> Result<bool, StoreError> {
        (**self).delete_role(role_id)
    }

    fn load_roles(&self) -> Result<Vec<Role>, StoreError> {
        (**self).load_roles()
    }

    fn save_assignment(&self, assignment: &RoleAssignment) -> Result<(), StoreError> {
        (**self).save_assignment(assignment)
    }

    fn load_assignments(&self) -> Result<Vec<RoleAssignment>, StoreError> {
        (**self).load_assignments()
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
