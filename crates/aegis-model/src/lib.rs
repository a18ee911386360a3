//! AEGIS data model
//!
//! Defines the entities the access-control engine operates on:
//!
//! - [`Permission`] - a resource glob plus the actions it allows
//! - [`Role`] - an ordered permission set with parent roles and a priority
//! - [`RoleAssignment`] - a principal/role binding with scope and expiry
//! - [`AccessCheckResult`] - the structured outcome of a single decision
//!
//! All types are plain data: no I/O, no locking. Matching semantics live on
//! [`ResourcePattern`] (shell-glob, `*` crosses `/`, case-sensitive).

pub mod assignment;
pub mod decision;
pub mod pattern;
pub mod permission;
pub mod role;

pub use assignment::{AssignmentId, PrincipalKind, RoleAssignment};
pub use decision::AccessCheckResult;
pub use pattern::ResourcePattern;
pub use permission::Permission;
pub use role::Role;

/// Open string-keyed map for `conditions`/`metadata` pass-through fields.
///
/// Never interpreted by matching logic; carried through persistence and the
/// audit hook untouched.
pub type ValueMap = std::collections::HashMap<String, serde_json::Value>;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
