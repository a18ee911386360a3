//! Access decisions

use crate::ValueMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single access check
///
/// Created fresh on every check and handed to the audit hook; the engine
/// never stores it. `matched_roles`/`matched_permissions` list every
/// contributor across all effective roles, in resolution (priority) order,
/// for audit transparency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessCheckResult {
    /// Whether access is granted
    pub allowed: bool,
    /// Principal that was checked
    pub principal_id: String,
    /// Resource that was checked
    pub resource: String,
    /// Action that was checked
    pub action: String,
    /// Ids of roles that contributed a match, deduplicated
    pub matched_roles: Vec<String>,
    /// Ids of permissions that matched, deduplicated
    pub matched_permissions: Vec<String>,
    /// Human-readable explanation
    pub reason: String,
    /// When the check ran
    pub timestamp: DateTime<Utc>,
    /// Wall-clock duration of resolution plus matching
    pub duration_ms: f64,
    /// Caller-supplied context, forwarded untouched for auditing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ValueMap>,
}

impl AccessCheckResult {
    /// Build a granted result
    #[must_use]
    pub fn allow(
        principal_id: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
        matched_roles: Vec<String>,
        matched_permissions: Vec<String>,
    ) -> Self {
        let reason = format!("Allowed by role(s): {}", matched_roles.join(", "));
        Self {
            allowed: true,
            principal_id: principal_id.into(),
            resource: resource.into(),
            action: action.into(),
            matched_roles,
            matched_permissions,
            reason,
            timestamp: Utc::now(),
            duration_ms: 0.0,
            context: None,
        }
    }

    /// Build a denied result
    #[must_use]
    pub fn deny(
        principal_id: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            allowed: false,
            principal_id: principal_id.into(),
            resource: resource.into(),
            action: action.into(),
            matched_roles: Vec::new(),
            matched_permissions: Vec::new(),
            reason: "No matching permission found".to_string(),
            timestamp: Utc::now(),
            duration_ms: 0.0,
            context: None,
        }
    }

    /// With measured duration
    #[inline]
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// With caller context attached
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: Option<ValueMap>) -> Self {
        self.context = context;
        self
    }
}
