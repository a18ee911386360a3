//! Volatile in-memory backend

use crate::{GrantStore, StoreError};
use aegis_model::{AssignmentId, Role, RoleAssignment};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory [`GrantStore`]
///
/// Holds roles and assignments for the lifetime of the process. Used by
/// tests and by embedders that manage durability themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    roles: RwLock<HashMap<String, Role>>,
    assignments: RwLock<HashMap<AssignmentId, RoleAssignment>>,
}

impl MemoryStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GrantStore for MemoryStore {
    fn save_role(&self, role: &Role) -> Result<(), StoreError> {
        self.roles.write().insert(role.id.clone(), role.clone());
        Ok(())
    }

    fn delete_role(&self, role_id: &str) -> Result<bool, StoreError> {
        Ok(self.roles.write().remove(role_id).is_some())
    }

    fn load_roles(&self) -> Result<Vec<Role>, StoreError> {
        Ok(self.roles.read().values().cloned().collect())
    }

    fn save_assignment(&self, assignment: &RoleAssignment) -> Result<(), StoreError> {
        self.assignments
            .write()
            .insert(assignment.id.clone(), assignment.clone());
        Ok(())
    }

    fn load_assignments(&self) -> Result<Vec<RoleAssignment>, StoreError> {
        Ok(self.assignments.read().values().cloned().collect())
    }
}
