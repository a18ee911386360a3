//! Roles: ordered permission sets with inheritance and priority

use crate::permission::Permission;
use crate::ValueMap;
use serde::{Deserialize, Serialize};

fn default_priority() -> i32 {
    50
}

/// A named role
///
/// Grants its own permissions plus, transitively, those of every role listed
/// in `parent_roles`. The parent graph may contain cycles; resolution guards
/// against them with a visited set. `priority` orders roles in resolution
/// results (higher first); `is_system` marks built-ins that user code can
/// neither overwrite nor delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Permissions, in declaration order
    pub permissions: Vec<Permission>,
    /// Ids of roles this role inherits from
    #[serde(default)]
    pub parent_roles: Vec<String>,
    /// Ordering weight, higher wins
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// Built-in marker; system roles are never persisted
    #[serde(default)]
    pub is_system: bool,
    /// Pass-through extension point
    #[serde(default)]
    pub metadata: ValueMap,
}

impl Role {
    /// Create a new custom role (priority 50, no parents)
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            permissions: Vec::new(),
            parent_roles: Vec::new(),
            priority: default_priority(),
            is_system: false,
            metadata: ValueMap::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With a permission appended
    #[inline]
    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// With permissions replaced
    #[inline]
    #[must_use]
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    /// With parent roles
    #[inline]
    #[must_use]
    pub fn with_parents(mut self, parents: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.parent_roles = parents.into_iter().map(Into::into).collect();
        self
    }

    /// With priority
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// With a metadata entry
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Mark as a built-in system role
    #[inline]
    #[must_use]
    pub fn as_system(mut self) -> Self {
        self.is_system = true;
        self
    }

    /// First permission covering `action` on `resource`, in declaration order
    #[inline]
    #[must_use]
    pub fn first_match(&self, resource: &str, action: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.matches(resource, action))
    }
}
