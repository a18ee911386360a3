//! Role assignments: principal/role bindings with scope and expiry

use crate::pattern::ResourcePattern;
use crate::ValueMap;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Deterministic assignment identifier
///
/// Derived from a Blake3 hash of (principal id, role id, scope-or-`*`),
/// truncated to 16 hex chars. Re-deriving for the same triple yields the same
/// id, which gives `assign_role` its upsert semantics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(String);

impl AssignmentId {
    /// Derive the id for a (principal, role, scope) triple
    #[must_use]
    pub fn derive(principal_id: &str, role_id: &str, scope: Option<&str>) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(principal_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(role_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(scope.unwrap_or("*").as_bytes());
        let hash = hasher.finalize();
        Self(hex::encode(&hash.as_bytes()[..8]))
    }

    /// Hex string form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AssignmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of principal an assignment binds
///
/// The wire form is a free-form string; the three well-known kinds get
/// variants, anything else is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrincipalKind {
    /// A human user
    User,
    /// A platform service
    Service,
    /// An API key
    ApiKey,
    /// Any other caller-defined kind
    Other(String),
}

impl PrincipalKind {
    /// String form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Service => "service",
            Self::ApiKey => "api_key",
            Self::Other(kind) => kind,
        }
    }
}

impl Default for PrincipalKind {
    fn default() -> Self {
        Self::User
    }
}

impl From<String> for PrincipalKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "user" => Self::User,
            "service" => Self::Service,
            "api_key" => Self::ApiKey,
            _ => Self::Other(kind),
        }
    }
}

impl From<PrincipalKind> for String {
    fn from(kind: PrincipalKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A role granted to a principal
///
/// Optionally narrowed to resources matching `scope` and bounded in time by
/// `expires_at`. Revocation flips `active` to false; records stay on disk
/// for audit history and are never physically removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Deterministic id, see [`AssignmentId::derive`]
    pub id: AssignmentId,
    /// Principal receiving the role
    pub principal_id: String,
    /// Kind of principal
    #[serde(default)]
    pub principal_kind: PrincipalKind,
    /// Role being granted
    pub role_id: String,
    /// Optional glob narrowing which resources this grant applies to
    #[serde(default)]
    pub scope: Option<ResourcePattern>,
    /// Who granted it
    #[serde(default)]
    pub granted_by: Option<String>,
    /// Grant time
    pub granted_at: DateTime<Utc>,
    /// Optional expiry; past expiry the assignment is ignored
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Pass-through extension point
    #[serde(default)]
    pub conditions: ValueMap,
    /// Soft-delete flag
    pub active: bool,
}

impl RoleAssignment {
    /// Create a new active assignment
    ///
    /// The scope participates in id derivation, so it is fixed at
    /// construction time rather than settable through a builder method.
    #[must_use]
    pub fn new(
        principal_id: impl Into<String>,
        role_id: impl Into<String>,
        scope: Option<ResourcePattern>,
    ) -> Self {
        let principal_id = principal_id.into();
        let role_id = role_id.into();
        let id = AssignmentId::derive(
            &principal_id,
            &role_id,
            scope.as_ref().map(ResourcePattern::as_str),
        );
        Self {
            id,
            principal_id,
            principal_kind: PrincipalKind::default(),
            role_id,
            scope,
            granted_by: None,
            granted_at: Utc::now(),
            expires_at: None,
            conditions: ValueMap::new(),
            active: true,
        }
    }

    /// With principal kind
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: PrincipalKind) -> Self {
        self.principal_kind = kind;
        self
    }

    /// With grantor
    #[inline]
    #[must_use]
    pub fn granted_by(mut self, grantor: impl Into<String>) -> Self {
        self.granted_by = Some(grantor.into());
        self
    }

    /// Expire this assignment `days` from now
    ///
    /// Negative values produce an already-expired grant.
    #[inline]
    #[must_use]
    pub fn expires_in_days(mut self, days: i64) -> Self {
        self.expires_at = Some(Utc::now() + Duration::days(days));
        self
    }

    /// With a condition entry
    #[inline]
    #[must_use]
    pub fn with_condition(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.conditions.insert(key.into(), value);
        self
    }

    /// True iff active and not past expiry
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.active && self.expires_at.map_or(true, |at| Utc::now() < at)
    }

    /// True iff this assignment covers `resource`
    ///
    /// Unscoped assignments cover everything. The literal resource `"*"`
    /// matches any scope, so resolving against `"*"` returns a principal's
    /// full role set.
    #[must_use]
    pub fn applies_to(&self, resource: &str) -> bool {
        match &self.scope {
            None => true,
            Some(scope) => resource == "*" || scope.matches(resource),
        }
    }
}
