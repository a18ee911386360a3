//! Behavioral properties of the access-control engine

use aegis_engine::builtin::{ADMIN, AUDITOR, DEVELOPER, VIEWER};
use aegis_engine::prelude::*;
use std::sync::{Arc, Mutex};

fn engine() -> AccessControlEngine<MemoryStore> {
    AccessControlEngine::in_memory()
}

#[test]
fn admin_passes_everything() {
    let engine = engine();
    engine.assign_role(Grant::new("root", ADMIN)).unwrap();

    for (resource, action) in [
        ("project/maestro/code/main.py", "delete"),
        ("audit/log1", "export"),
        ("anything/at/all", "frobnicate"),
        ("x", "y"),
    ] {
        let result = engine.check_access("root", resource, action);
        assert!(result.allowed, "admin denied {action} on {resource}");
        assert_eq!(result.matched_roles, vec![ADMIN.to_string()]);
    }
}

#[test]
fn deny_by_default() {
    let engine = engine();
    let result = engine.check_access("nobody", "project/x", "read");
    assert!(!result.allowed);
    assert!(result.matched_roles.is_empty());
    assert!(result.matched_permissions.is_empty());
    assert_eq!(result.reason, "No matching permission found");
}

#[test]
fn expired_assignment_is_excluded() {
    let engine = engine();
    engine
        .assign_role(Grant::new("u3", AUDITOR).expires_in_days(-1))
        .unwrap();

    assert!(!engine.check_access("u3", "audit/log1", "read").allowed);
    // The record itself is still listed, just not effective.
    let listed = engine.list_assignments("u3");
    assert_eq!(listed.len(), 1);
    assert!(listed[0].active);
    assert!(!listed[0].is_valid());
}

#[test]
fn revocation_is_immediately_visible() {
    let engine = engine();
    engine.assign_role(Grant::new("u1", VIEWER)).unwrap();
    assert!(engine.check_access("u1", "project/x", "read").allowed);

    assert!(engine.revoke_role("u1", VIEWER, None).unwrap());
    assert!(!engine.check_access("u1", "project/x", "read").allowed);
}

#[test]
fn revoking_missing_assignment_returns_false() {
    let engine = engine();
    assert!(!engine.revoke_role("u1", VIEWER, None).unwrap());
    assert!(!engine.revoke_role("u1", "no-such-role", None).unwrap());
}

#[test]
fn scope_restricts_where_the_role_applies() {
    let engine = engine();
    engine
        .assign_role(Grant::new("u5", DEVELOPER).with_scope("project/alpha/*"))
        .unwrap();

    assert!(
        engine
            .check_access("u5", "project/alpha/code/main.rs", "write")
            .allowed
    );
    // Would match the role's permissions, but the scope excludes it.
    assert!(
        !engine
            .check_access("u5", "project/beta/code/main.rs", "write")
            .allowed
    );
}

#[test]
fn cyclic_parent_graph_resolves_each_role_once() {
    let engine = engine();
    engine
        .create_role(
            Role::new("cycle-a", "Cycle A")
                .with_permission(Permission::new("a-read", "A read", "a/*", ["read"]))
                .with_parents(["cycle-b"]),
        )
        .unwrap();
    engine
        .create_role(
            Role::new("cycle-b", "Cycle B")
                .with_permission(Permission::new("b-read", "B read", "b/*", ["read"]))
                .with_parents(["cycle-a"]),
        )
        .unwrap();
    engine.assign_role(Grant::new("u6", "cycle-a")).unwrap();

    let roles = engine.get_principal_roles("u6");
    let mut ids: Vec<_> = roles.iter().map(|r| r.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["cycle-a", "cycle-b"]);

    // Inherited permissions work through the cycle.
    assert!(engine.check_access("u6", "b/item", "read").allowed);
}

#[test]
fn reassignment_is_idempotent_and_updates_in_place() {
    let engine = engine();
    let first = engine.assign_role(Grant::new("u7", VIEWER)).unwrap();
    assert!(first.expires_at.is_none());

    let second = engine
        .assign_role(Grant::new("u7", VIEWER).expires_in_days(30))
        .unwrap();
    assert_eq!(first.id, second.id);
    assert!(second.expires_at.is_some());

    let listed = engine.list_assignments("u7");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].expires_at, second.expires_at);
}

#[test]
fn reassignment_reactivates_a_revoked_grant() {
    let engine = engine();
    engine.assign_role(Grant::new("u7", VIEWER)).unwrap();
    engine.revoke_role("u7", VIEWER, None).unwrap();
    assert!(!engine.check_access("u7", "project/x", "read").allowed);

    engine.assign_role(Grant::new("u7", VIEWER)).unwrap();
    assert!(engine.check_access("u7", "project/x", "read").allowed);
}

#[test]
fn all_matching_roles_are_reported_higher_priority_first() {
    let engine = engine();
    engine
        .create_role(
            Role::new("lead", "Lead")
                .with_permission(Permission::new("lead-read", "Lead read", "project/*", ["read"]))
                .with_priority(200),
        )
        .unwrap();
    engine
        .create_role(
            Role::new("helper", "Helper")
                .with_permission(Permission::new(
                    "helper-read",
                    "Helper read",
                    "project/*",
                    ["read"],
                ))
                .with_priority(20),
        )
        .unwrap();

    // Assignment order must not matter for the reported ordering.
    engine.assign_role(Grant::new("u8", "helper")).unwrap();
    engine.assign_role(Grant::new("u8", "lead")).unwrap();

    let result = engine.check_access("u8", "project/alpha", "read");
    assert!(result.allowed);
    assert_eq!(
        result.matched_roles,
        vec!["lead".to_string(), "helper".to_string()]
    );
    assert_eq!(
        result.matched_permissions,
        vec!["lead-read".to_string(), "helper-read".to_string()]
    );
}

#[test]
fn system_roles_cannot_be_overwritten_or_deleted() {
    let engine = engine();
    let before = engine.get_role(ADMIN).unwrap();

    let err = engine
        .create_role(Role::new(ADMIN, "Fake Admin"))
        .unwrap_err();
    assert!(matches!(err, EngineError::SystemRoleProtected(id) if id == ADMIN));

    let err = engine.delete_role(ADMIN).unwrap_err();
    assert!(matches!(err, EngineError::SystemRoleProtected(_)));

    assert_eq!(engine.get_role(ADMIN).unwrap(), before);
}

#[test]
fn custom_roles_can_be_deleted() {
    let engine = engine();
    engine.create_role(Role::new("temp", "Temp")).unwrap();
    assert!(engine.delete_role("temp").unwrap());
    assert!(!engine.delete_role("temp").unwrap());
    assert!(engine.get_role("temp").is_none());
}

#[test]
fn scenario_developer_code_access() {
    let engine = engine();
    engine.assign_role(Grant::new("u1", DEVELOPER)).unwrap();

    assert!(
        engine
            .check_access("u1", "project/maestro/code/main.py", "read")
            .allowed
    );
    assert!(
        !engine
            .check_access("u1", "project/maestro/code/main.py", "delete")
            .allowed
    );
}

#[test]
fn scenario_scoped_viewer() {
    let engine = engine();
    engine
        .assign_role(Grant::new("u2", VIEWER).with_scope("project/demo/*"))
        .unwrap();

    assert!(
        engine
            .check_access("u2", "project/demo/readme.md", "read")
            .allowed
    );
    assert!(
        !engine
            .check_access("u2", "project/other/readme.md", "read")
            .allowed
    );
}

#[test]
fn scenario_expired_auditor() {
    let engine = engine();
    engine
        .assign_role(Grant::new("u3", AUDITOR).expires_in_days(-1))
        .unwrap();
    assert!(!engine.check_access("u3", "audit/log1", "read").allowed);
}

#[test]
fn scoped_assignments_still_count_toward_principal_roles() {
    let engine = engine();
    engine
        .assign_role(Grant::new("u2", VIEWER).with_scope("project/demo/*"))
        .unwrap();

    let roles = engine.get_principal_roles("u2");
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].id, VIEWER);
}

#[test]
fn clearing_the_cache_never_changes_decisions() {
    let engine = engine();
    engine.assign_role(Grant::new("u1", DEVELOPER)).unwrap();

    let warm = engine.check_access("u1", "project/p/code/a.rs", "write");
    engine.clear_cache();
    let cold = engine.check_access("u1", "project/p/code/a.rs", "write");

    assert_eq!(warm.allowed, cold.allowed);
    assert_eq!(warm.matched_roles, cold.matched_roles);
    assert_eq!(warm.matched_permissions, cold.matched_permissions);
    assert_eq!(warm.reason, cold.reason);
}

#[test]
fn parent_roles_grant_inherited_permissions() {
    let engine = engine();
    engine
        .create_role(
            Role::new("senior-dev", "Senior Developer")
                .with_permission(Permission::new(
                    "release",
                    "Cut releases",
                    "release/*",
                    ["create"],
                ))
                .with_parents([DEVELOPER])
                .with_priority(150),
        )
        .unwrap();
    engine.assign_role(Grant::new("u9", "senior-dev")).unwrap();

    // Own permission plus everything inherited from developer.
    assert!(engine.check_access("u9", "release/v1.2", "create").allowed);
    assert!(
        engine
            .check_access("u9", "project/p/code/x.py", "write")
            .allowed
    );

    let roles = engine.get_principal_roles("u9");
    let ids: Vec<_> = roles.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["senior-dev", DEVELOPER]);
}

#[test]
fn audit_hook_sees_every_decision() {
    let engine = engine();
    let seen: Arc<Mutex<Vec<AccessCheckResult>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    engine.set_audit_hook(move |decision| sink.lock().unwrap().push(decision.clone()));

    engine.assign_role(Grant::new("u1", VIEWER)).unwrap();
    engine.check_access("u1", "project/x", "read");
    engine.check_access("u1", "project/x", "write");
    let _ = engine.enforce("u1", "project/x", "write");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].allowed);
    assert!(!seen[1].allowed);
    assert!(!seen[2].allowed);
}

#[test]
fn panicking_audit_hook_does_not_affect_decisions() {
    let engine = engine();
    engine.assign_role(Grant::new("u1", VIEWER)).unwrap();
    engine.set_audit_hook(|_| panic!("audit sink exploded"));

    let result = engine.check_access("u1", "project/x", "read");
    assert!(result.allowed);

    // Engine keeps working afterwards, hook replacement included.
    engine.clear_audit_hook();
    assert!(engine.check_access("u1", "project/x", "read").allowed);
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn admin_wildcard_allows_any_pair(
            resource in "[a-z0-9._-]{1,10}(/[a-z0-9._-]{1,10}){0,4}",
            action in "[a-z]{1,12}",
        ) {
            let engine = engine();
            engine.assign_role(Grant::new("root", ADMIN)).unwrap();
            prop_assert!(engine.check_access("root", &resource, &action).allowed);
        }

        #[test]
        fn unassigned_principal_is_always_denied(
            resource in "[a-z0-9._-]{1,10}(/[a-z0-9._-]{1,10}){0,4}",
            action in "[a-z]{1,12}",
        ) {
            let engine = engine();
            let result = engine.check_access("nobody", &resource, &action);
            prop_assert!(!result.allowed);
            prop_assert!(result.matched_roles.is_empty());
        }
    }
}
