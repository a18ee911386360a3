//! Permissions: a resource pattern plus allowed actions

use crate::pattern::ResourcePattern;
use crate::ValueMap;
use serde::{Deserialize, Serialize};

/// A single permission inside a role
///
/// Grants a set of actions on resources matched by `resource_pattern`.
/// Action patterns are exact case-sensitive strings, except the wildcard
/// `"*"` which allows any action. Immutable once attached to a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    /// Identifier, unique within its role
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Glob over resource paths
    pub resource_pattern: ResourcePattern,
    /// Allowed actions, in declaration order; may contain `"*"`
    pub actions: Vec<String>,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Pass-through extension point, never consulted by matching
    #[serde(default)]
    pub conditions: ValueMap,
}

impl Permission {
    /// Create a new permission
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resource_pattern: impl Into<ResourcePattern>,
        actions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_pattern: resource_pattern.into(),
            actions: actions.into_iter().map(Into::into).collect(),
            description: String::new(),
            conditions: ValueMap::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With a condition entry
    #[inline]
    #[must_use]
    pub fn with_condition(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.conditions.insert(key.into(), value);
        self
    }

    /// Check whether this permission covers `action` on `resource`
    ///
    /// True iff the resource pattern glob-matches `resource` AND some action
    /// pattern equals `action` exactly or is the wildcard `"*"`.
    #[must_use]
    pub fn matches(&self, resource: &str, action: &str) -> bool {
        if !self.resource_pattern.matches(resource) {
            return false;
        }
        self.actions.iter().any(|a| a == "*" || a == action)
    }
}
