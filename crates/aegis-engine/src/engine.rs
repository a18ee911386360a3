//! The access-control engine
//!
//! Owns the in-memory role and assignment tables, the resolution cache, and
//! the audit hook. All mutation paths persist through the injected
//! [`GrantStore`] before committing to memory, so a failed save leaves the
//! engine state unchanged.

use crate::builtin;
use crate::cache::{CacheStats, ResolutionCache};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::grant::Grant;
use aegis_model::{AccessCheckResult, AssignmentId, Role, RoleAssignment, ValueMap};
use aegis_store::{GrantStore, MemoryStore};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Callback observing every access decision
pub type AuditHook = Arc<dyn Fn(&AccessCheckResult) + Send + Sync>;

/// Access-control engine
///
/// Decides `(principal, resource, action)` questions from scoped, expiring
/// role assignments over a role hierarchy. One instance per application
/// context, shared by reference; all methods take `&self`.
pub struct AccessControlEngine<S: GrantStore = MemoryStore> {
    config: EngineConfig,
    store: S,
    roles: RwLock<IndexMap<String, Role>>,
    assignments: RwLock<IndexMap<AssignmentId, RoleAssignment>>,
    cache: ResolutionCache,
    audit_hook: RwLock<Option<AuditHook>>,
}

impl AccessControlEngine<MemoryStore> {
    /// Engine backed by a fresh [`MemoryStore`], defaults throughout
    #[must_use]
    pub fn in_memory() -> Self {
        Self::seeded(MemoryStore::new(), EngineConfig::default())
    }
}

impl<S: GrantStore> AccessControlEngine<S> {
    /// Engine over `store` with default configuration
    ///
    /// # Errors
    /// Fails only if the store cannot be read at all; individual corrupt
    /// records are skipped by the store layer.
    pub fn new(store: S) -> Result<Self, EngineError> {
        Self::with_config(store, EngineConfig::default())
    }

    /// Engine over `store` with explicit configuration
    ///
    /// Seeds the built-in roles, then loads persisted custom roles and
    /// assignments.
    pub fn with_config(store: S, config: EngineConfig) -> Result<Self, EngineError> {
        let engine = Self::seeded(store, config);
        engine.load()?;
        Ok(engine)
    }

    fn seeded(store: S, config: EngineConfig) -> Self {
        let mut roles = IndexMap::new();
        for role in builtin::builtin_roles() {
            roles.insert(role.id.clone(), role);
        }
        let cache = ResolutionCache::new(config.cache_ttl);
        Self {
            config,
            store,
            roles: RwLock::new(roles),
            assignments: RwLock::new(IndexMap::new()),
            cache,
            audit_hook: RwLock::new(None),
        }
    }

    fn load(&self) -> Result<(), EngineError> {
        let persisted_roles = self.store.load_roles()?;
        let mut roles = self.roles.write();
        let mut custom = 0usize;
        for role in persisted_roles {
            if roles.get(&role.id).is_some_and(|existing| existing.is_system) {
                warn!(role = %role.id, "persisted role shadows a built-in, ignored");
                continue;
            }
            roles.insert(role.id.clone(), role);
            custom += 1;
        }
        drop(roles);

        let persisted = self.store.load_assignments()?;
        let mut assignments = self.assignments.write();
        for assignment in persisted {
            assignments.insert(assignment.id.clone(), assignment);
        }
        info!(
            custom_roles = custom,
            assignments = assignments.len(),
            "engine state loaded"
        );
        Ok(())
    }

    /// Current configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide whether `principal_id` may perform `action` on `resource`
    ///
    /// Never fails: denial is an ordinary result. The registered audit hook
    /// (if any) observes the result before it is returned.
    pub fn check_access(
        &self,
        principal_id: &str,
        resource: &str,
        action: &str,
    ) -> AccessCheckResult {
        self.check_access_with_context(principal_id, resource, action, None)
    }

    /// [`check_access`](Self::check_access) with caller context attached
    ///
    /// The context is forwarded to the audit hook untouched; it does not
    /// participate in the decision.
    pub fn check_access_with_context(
        &self,
        principal_id: &str,
        resource: &str,
        action: &str,
        context: Option<ValueMap>,
    ) -> AccessCheckResult {
        let started = Instant::now();
        let effective = self.effective_roles(principal_id, resource);

        // Every effective role is scanned, not just the first match: the
        // matched_roles/matched_permissions lists feed audit trails.
        let mut matched_roles: Vec<String> = Vec::new();
        let mut matched_permissions: Vec<String> = Vec::new();
        for role in &effective {
            if let Some(permission) = role.first_match(resource, action) {
                if !matched_roles.contains(&role.id) {
                    matched_roles.push(role.id.clone());
                }
                if !matched_permissions.contains(&permission.id) {
                    matched_permissions.push(permission.id.clone());
                }
            }
        }

        let result = if matched_roles.is_empty() {
            AccessCheckResult::deny(principal_id, resource, action)
        } else {
            AccessCheckResult::allow(
                principal_id,
                resource,
                action,
                matched_roles,
                matched_permissions,
            )
        }
        .with_duration_ms(started.elapsed().as_secs_f64() * 1000.0)
        .with_context(context);

        debug!(
            principal = principal_id,
            resource,
            action,
            allowed = result.allowed,
            "access checked"
        );
        self.emit_audit(&result);
        result
    }

    /// Like [`check_access`](Self::check_access) but denial becomes an error
    pub fn enforce(
        &self,
        principal_id: &str,
        resource: &str,
        action: &str,
    ) -> Result<(), EngineError> {
        self.enforce_with_context(principal_id, resource, action, None)
    }

    /// [`enforce`](Self::enforce) with caller context attached
    pub fn enforce_with_context(
        &self,
        principal_id: &str,
        resource: &str,
        action: &str,
        context: Option<ValueMap>,
    ) -> Result<(), EngineError> {
        let result = self.check_access_with_context(principal_id, resource, action, context);
        if result.allowed {
            Ok(())
        } else {
            Err(EngineError::AccessDenied {
                principal_id: principal_id.to_string(),
                resource: resource.to_string(),
                action: action.to_string(),
                reason: result.reason,
            })
        }
    }

    /// Grant a role to a principal
    ///
    /// The assignment id is deterministic in (principal, role, scope), so
    /// re-granting the same triple overwrites the earlier record and resets
    /// its expiry and active flag.
    ///
    /// # Errors
    /// [`EngineError::UnknownRole`] if the role does not exist;
    /// [`EngineError::Storage`] if persisting fails (state unchanged).
    pub fn assign_role(&self, grant: Grant) -> Result<RoleAssignment, EngineError> {
        if !self.roles.read().contains_key(&grant.role_id) {
            return Err(EngineError::UnknownRole(grant.role_id));
        }
        let mut assignment = grant.into_assignment();
        if assignment.granted_by.is_none() {
            assignment.granted_by = self.config.default_granted_by.clone();
        }

        self.store.save_assignment(&assignment)?;
        self.assignments
            .write()
            .insert(assignment.id.clone(), assignment.clone());
        self.cache.invalidate_principal(&assignment.principal_id);
        info!(
            principal = %assignment.principal_id,
            role = %assignment.role_id,
            assignment = %assignment.id,
            "role assigned"
        );
        Ok(assignment)
    }

    /// Revoke a previously granted role
    ///
    /// Soft-deletes: the record stays (in memory and on disk) with
    /// `active == false`. Returns false when no such assignment exists.
    pub fn revoke_role(
        &self,
        principal_id: &str,
        role_id: &str,
        scope: Option<&str>,
    ) -> Result<bool, EngineError> {
        let id = AssignmentId::derive(principal_id, role_id, scope);
        let Some(mut assignment) = self.assignments.read().get(&id).cloned() else {
            return Ok(false);
        };
        assignment.active = false;

        self.store.save_assignment(&assignment)?;
        self.assignments.write().insert(id, assignment);
        self.cache.invalidate_principal(principal_id);
        info!(principal = principal_id, role = role_id, "role revoked");
        Ok(true)
    }

    /// All assignments recorded for a principal, revoked and expired included
    #[must_use]
    pub fn list_assignments(&self, principal_id: &str) -> Vec<RoleAssignment> {
        self.assignments
            .read()
            .values()
            .filter(|a| a.principal_id == principal_id)
            .cloned()
            .collect()
    }

    /// Create or overwrite a custom role
    ///
    /// The stored role is always non-system regardless of the input flag.
    ///
    /// # Errors
    /// [`EngineError::SystemRoleProtected`] if the id belongs to a built-in.
    pub fn create_role(&self, role: Role) -> Result<Role, EngineError> {
        if self
            .roles
            .read()
            .get(&role.id)
            .is_some_and(|existing| existing.is_system)
        {
            return Err(EngineError::SystemRoleProtected(role.id));
        }
        let mut role = role;
        role.is_system = false;

        self.store.save_role(&role)?;
        self.roles.write().insert(role.id.clone(), role.clone());
        // Role edits can reshape parent chains, so all cached memberships are suspect.
        self.cache.clear();
        info!(role = %role.id, "custom role created");
        Ok(role)
    }

    /// Delete a custom role; returns false when it does not exist
    ///
    /// # Errors
    /// [`EngineError::SystemRoleProtected`] if the id belongs to a built-in.
    pub fn delete_role(&self, role_id: &str) -> Result<bool, EngineError> {
        match self.roles.read().get(role_id) {
            None => return Ok(false),
            Some(role) if role.is_system => {
                return Err(EngineError::SystemRoleProtected(role_id.to_string()));
            }
            Some(_) => {}
        }

        self.store.delete_role(role_id)?;
        self.roles.write().shift_remove(role_id);
        self.cache.clear();
        info!(role = role_id, "custom role deleted");
        Ok(true)
    }

    /// Look up a role by id
    #[must_use]
    pub fn get_role(&self, role_id: &str) -> Option<Role> {
        self.roles.read().get(role_id).cloned()
    }

    /// Every known role, built-ins first, then custom in creation order
    #[must_use]
    pub fn list_roles(&self) -> Vec<Role> {
        self.roles.read().values().cloned().collect()
    }

    /// A principal's full effective role set, ignoring assignment scopes
    ///
    /// Resolves against the wildcard resource `"*"`, which every scope
    /// pattern covers trivially.
    #[must_use]
    pub fn get_principal_roles(&self, principal_id: &str) -> Vec<Role> {
        self.effective_roles(principal_id, "*")
    }

    /// Effective roles for (principal, resource): valid, in-scope
    /// assignments expanded through parent chains, priority descending.
    fn effective_roles(&self, principal_id: &str, resource: &str) -> Vec<Role> {
        let key = ResolutionCache::key(principal_id, resource);
        let roles = self.roles.read();
        if let Some(ids) = self.cache.get(&key) {
            // Ids are re-read against the live table so permission edits to
            // an existing role take effect without waiting out the TTL.
            return ids.iter().filter_map(|id| roles.get(id).cloned()).collect();
        }

        let assignments = self.assignments.read();
        let mut seen: HashSet<String> = HashSet::new();
        let mut collected: Vec<Role> = Vec::new();
        for assignment in assignments.values() {
            if assignment.principal_id != principal_id
                || !assignment.is_valid()
                || !assignment.applies_to(resource)
            {
                continue;
            }
            Self::collect_role_tree(&roles, &assignment.role_id, &mut seen, &mut collected);
        }
        // Stable: equal priorities keep discovery order.
        collected.sort_by_key(|role| Reverse(role.priority));

        self.cache
            .insert(key, collected.iter().map(|r| r.id.clone()).collect());
        collected
    }

    /// Walk a role and its ancestors, cycle-safe via the shared `seen` set
    fn collect_role_tree(
        roles: &IndexMap<String, Role>,
        role_id: &str,
        seen: &mut HashSet<String>,
        out: &mut Vec<Role>,
    ) {
        if !seen.insert(role_id.to_string()) {
            return;
        }
        let Some(role) = roles.get(role_id) else {
            warn!(role = role_id, "assignment references unknown role");
            return;
        };
        out.push(role.clone());
        for parent in &role.parent_roles {
            Self::collect_role_tree(roles, parent, seen, out);
        }
    }

    /// Drop every cached resolution; decisions are unaffected, only latency
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Cache hit/miss counters and current entry count
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Register the audit hook, replacing any previous one
    ///
    /// Invoked synchronously with every decision. A panicking hook is caught
    /// and logged; it never alters the decision or reaches the caller.
    pub fn set_audit_hook(&self, hook: impl Fn(&AccessCheckResult) + Send + Sync + 'static) {
        *self.audit_hook.write() = Some(Arc::new(hook));
    }

    /// Remove the audit hook
    pub fn clear_audit_hook(&self) {
        *self.audit_hook.write() = None;
    }

    fn emit_audit(&self, result: &AccessCheckResult) {
        let hook = self.audit_hook.read().clone();
        if let Some(hook) = hook {
            if catch_unwind(AssertUnwindSafe(|| hook(result))).is_err() {
                warn!(
                    principal = %result.principal_id,
                    resource = %result.resource,
                    "audit hook panicked, decision unaffected"
                );
            }
        }
    }
}

impl<S: GrantStore> std::fmt::Debug for AccessControlEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControlEngine")
            .field("roles", &self.roles.read().len())
            .field("assignments", &self.assignments.read().len())
            .field("cache", &self.cache.stats())
            .finish_non_exhaustive()
    }
}
