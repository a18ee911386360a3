//! Built-in roles
//!
//! Seeded on every engine construction and never persisted; user code cannot
//! overwrite or delete them.

use aegis_model::{Permission, Role};

/// Id of the built-in administrator role
pub const ADMIN: &str = "admin";
/// Id of the built-in developer role
pub const DEVELOPER: &str = "developer";
/// Id of the built-in read-only viewer role
pub const VIEWER: &str = "viewer";
/// Id of the built-in auditor role
pub const AUDITOR: &str = "auditor";

pub(crate) fn builtin_roles() -> Vec<Role> {
    vec![admin(), developer(), viewer(), auditor()]
}

fn admin() -> Role {
    Role::new(ADMIN, "Administrator")
        .with_description("Unrestricted access to every resource and action")
        .with_permission(Permission::new("admin-all", "Full access", "*", ["*"]))
        .with_priority(1000)
        .as_system()
}

fn developer() -> Role {
    Role::new(DEVELOPER, "Developer")
        .with_description("Read/write on project code, read on projects and compliance")
        .with_permission(Permission::new(
            "code-rw",
            "Code read/write",
            "project/*/code/*",
            ["read", "write", "create", "update"],
        ))
        .with_permission(Permission::new(
            "project-read",
            "Project read",
            "project/*",
            ["read"],
        ))
        .with_permission(Permission::new(
            "compliance-read",
            "Compliance read",
            "compliance/*",
            ["read"],
        ))
        .with_priority(100)
        .as_system()
}

fn viewer() -> Role {
    Role::new(VIEWER, "Viewer")
        .with_description("Read-only access everywhere")
        .with_permission(Permission::new("global-read", "Global read", "*", ["read"]))
        .with_priority(10)
        .as_system()
}

fn auditor() -> Role {
    Role::new(AUDITOR, "Auditor")
        .with_description("Read and export over audit, compliance and risk data")
        .with_permission(Permission::new(
            "audit-read",
            "Audit read/export",
            "audit/*",
            ["read", "export"],
        ))
        .with_permission(Permission::new(
            "compliance-audit",
            "Compliance read/export",
            "compliance/*",
            ["read", "export"],
        ))
        .with_permission(Permission::new(
            "risk-read",
            "Risk read/export",
            "risk/*",
            ["read", "export"],
        ))
        .with_priority(50)
        .as_system()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_builtins_all_system() {
        let roles = builtin_roles();
        assert_eq!(roles.len(), 4);
        assert!(roles.iter().all(|r| r.is_system));
    }

    #[test]
    fn priorities_order_admin_first() {
        let mut roles = builtin_roles();
        roles.sort_by_key(|r| std::cmp::Reverse(r.priority));
        let ids: Vec<_> = roles.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![ADMIN, DEVELOPER, AUDITOR, VIEWER]);
    }

    #[test]
    fn developer_covers_code_but_not_delete() {
        let dev = developer();
        assert!(dev.first_match("project/maestro/code/main.py", "write").is_some());
        assert!(dev.first_match("project/maestro/code/main.py", "delete").is_none());
    }

    #[test]
    fn auditor_exports_but_does_not_write() {
        let auditor = auditor();
        assert!(auditor.first_match("audit/log1", "export").is_some());
        assert!(auditor.first_match("audit/log1", "write").is_none());
        assert!(auditor.first_match("project/x", "read").is_none());
    }
}
