//! Grant requests
//!
//! [`Grant`] is the builder-style input to
//! [`AccessControlEngine::assign_role`](crate::AccessControlEngine::assign_role).
//! The scope is part of the request because it participates in the
//! deterministic assignment id.

use aegis_model::{PrincipalKind, ResourcePattern, RoleAssignment, ValueMap};

/// Request to grant a role to a principal
#[derive(Debug, Clone)]
pub struct Grant {
    pub(crate) principal_id: String,
    pub(crate) role_id: String,
    kind: PrincipalKind,
    scope: Option<String>,
    granted_by: Option<String>,
    expires_in_days: Option<i64>,
    conditions: ValueMap,
}

impl Grant {
    /// Grant `role_id` to `principal_id`, unscoped and unbounded
    #[inline]
    #[must_use]
    pub fn new(principal_id: impl Into<String>, role_id: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            role_id: role_id.into(),
            kind: PrincipalKind::default(),
            scope: None,
            granted_by: None,
            expires_in_days: None,
            conditions: ValueMap::new(),
        }
    }

    /// With principal kind
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: PrincipalKind) -> Self {
        self.kind = kind;
        self
    }

    /// Narrow the grant to resources matching `scope`
    #[inline]
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Record who issued the grant
    #[inline]
    #[must_use]
    pub fn granted_by(mut self, grantor: impl Into<String>) -> Self {
        self.granted_by = Some(grantor.into());
        self
    }

    /// Expire the grant `days` from now (negative values are already expired)
    #[inline]
    #[must_use]
    pub fn expires_in_days(mut self, days: i64) -> Self {
        self.expires_in_days = Some(days);
        self
    }

    /// With a condition entry
    #[inline]
    #[must_use]
    pub fn with_condition(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.conditions.insert(key.into(), value);
        self
    }

    pub(crate) fn into_assignment(self) -> RoleAssignment {
        let mut assignment = RoleAssignment::new(
            self.principal_id,
            self.role_id,
            self.scope.map(ResourcePattern::new),
        )
        .with_kind(self.kind);
        if let Some(grantor) = self.granted_by {
            assignment = assignment.granted_by(grantor);
        }
        if let Some(days) = self.expires_in_days {
            assignment = assignment.expires_in_days(days);
        }
        assignment.conditions = self.conditions;
        assignment
    }
}
