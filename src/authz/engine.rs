use std::collections::{HashMap, HashSet};

use super::permissions;
use super::principal::{Principal, Role};

/// RBAC decision engine.
///
/// Evaluation order for `has_permission`:
/// 1. no principal -> deny
/// 2. super_admin role -> allow
/// 3. bare catalog permission in the role's set -> allow
/// 4. compound `resource:op` / `resource.op` mapped to `manage_<resource>` -> allow
/// 5. deny
///
/// No side effects, no I/O; the engine only supplies the boolean. Callers
/// convert denials into errors before mutating anything.
#[derive(Debug, Clone)]
pub struct AuthzEngine {
    role_permissions: HashMap<Role, HashSet<&'static str>>,
}

impl Default for AuthzEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthzEngine {
    pub fn new() -> Self {
        use permissions::*;

        let mut role_permissions: HashMap<Role, HashSet<&'static str>> = HashMap::new();

        // super_admin is deliberately absent: the bypass never consults the
        // table, and listing a set here would suggest it could be narrowed.
        role_permissions.insert(
            Role::Admin,
            [
                READ,
                WRITE,
                DELETE,
                MANAGE_CUSTOMERS,
                MANAGE_PRODUCT_SALES,
                MANAGE_TICKETS,
                MANAGE_CONTRACTS,
                MANAGE_USERS,
                MANAGE_ROLES,
                MANAGE_NOTIFICATIONS,
                MANAGE_FILES,
                VIEW_DASHBOARD,
                VIEW_AUDIT_LOGS,
            ]
            .into(),
        );
        role_permissions.insert(
            Role::Manager,
            [
                READ,
                WRITE,
                MANAGE_CUSTOMERS,
                MANAGE_PRODUCT_SALES,
                MANAGE_CONTRACTS,
                VIEW_DASHBOARD,
            ]
            .into(),
        );
        role_permissions.insert(
            Role::Agent,
            [READ, WRITE, MANAGE_TICKETS, MANAGE_NOTIFICATIONS].into(),
        );
        role_permissions.insert(
            Role::Engineer,
            [READ, WRITE, MANAGE_PRODUCT_SALES, MANAGE_TICKETS].into(),
        );
        role_permissions.insert(Role::Customer, [READ].into());

        Self { role_permissions }
    }

    /// Permission set configured for a role. Unmapped roles get the empty set.
    pub fn role_permissions(&self, role: Role) -> HashSet<&'static str> {
        self.role_permissions
            .get(&role)
            .cloned()
            .unwrap_or_default()
    }

    /// Core decision: may `principal` perform `action`?
    ///
    /// `action` is either a bare catalog identifier ("write",
    /// "manage_customers") or a compound "resource:operation" /
    /// "resource.operation" string. Unknown inputs resolve to `false`.
    pub fn has_permission(&self, principal: Option<&Principal>, action: &str) -> bool {
        let Some(principal) = principal else {
            return false;
        };

        if principal.is_super_admin() {
            tracing::debug!(
                user_id = %principal.id,
                action = %action,
                "super_admin bypass"
            );
            return true;
        }

        let granted = self.role_permissions(principal.role);

        if granted.contains(action) {
            tracing::debug!(
                user_id = %principal.id,
                action = %action,
                "direct permission match"
            );
            return true;
        }

        if let Some(required) = map_action(action) {
            if granted.contains(required.as_str()) {
                tracing::debug!(
                    user_id = %principal.id,
                    action = %action,
                    required = %required,
                    "compound action match"
                );
                return true;
            }
        }

        tracing::debug!(
            user_id = %principal.id,
            action = %action,
            "permission denied"
        );
        false
    }

    pub fn has_role(&self, principal: Option<&Principal>, role: Role) -> bool {
        principal.map(|p| p.has_role(role)).unwrap_or(false)
    }

    pub fn has_any_role(&self, principal: Option<&Principal>, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(principal, *role))
    }

    pub fn is_super_admin(&self, principal: Option<&Principal>) -> bool {
        principal.map(|p| p.is_super_admin()).unwrap_or(false)
    }

    /// Permission-management variant of `has_permission` with a different
    /// degradation rule: an action that maps to no known permission at all is
    /// allowed rather than denied, so an incomplete mapping table never locks
    /// users out of management screens. Keep separate from `has_permission`;
    /// the divergence is intentional.
    pub fn validate_role_permissions(&self, principal: Option<&Principal>, action: &str) -> bool {
        let known = permissions::is_known(action) || map_action(action).is_some();
        if !known {
            tracing::debug!(action = %action, "unmappable action, allowing (fail-open)");
            return true;
        }
        self.has_permission(principal, action)
    }
}

/// Parse a compound action and map it to its required generic permission.
///
/// "product_sales:create" -> "manage_product_sales". Every operation,
/// including view/view_details, maps to manage_<resource>; the only
/// read-only grant is the bare `read` catalog permission.
fn map_action(action: &str) -> Option<String> {
    let (resource, operation) = action
        .split_once(':')
        .or_else(|| action.split_once('.'))?;

    if resource.is_empty() || operation.is_empty() {
        return None;
    }

    Some(format!("manage_{resource}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn principal(role: Role) -> Principal {
        Principal::new(Uuid::new_v4(), "user@example.com", "Test User", role)
    }

    #[test]
    fn no_principal_denies_everything() {
        let engine = AuthzEngine::new();
        assert!(!engine.has_permission(None, "read"));
        assert!(!engine.has_role(None, Role::Admin));
        assert!(!engine.has_any_role(None, &Role::ALL));
        assert!(!engine.is_super_admin(None));
    }

    #[test]
    fn super_admin_bypasses_everything() {
        let engine = AuthzEngine::new();
        let root = principal(Role::SuperAdmin);
        assert!(engine.has_permission(Some(&root), "manage_customers"));
        assert!(engine.has_permission(Some(&root), "not_in_any_table"));
        assert!(engine.has_permission(Some(&root), "anything:at_all"));
        assert!(engine.is_super_admin(Some(&root)));
    }

    #[test]
    fn any_role_matches_across_a_slice() {
        let engine = AuthzEngine::new();
        let agent = principal(Role::Agent);
        assert!(engine.has_any_role(Some(&agent), &[Role::Manager, Role::Agent]));
        assert!(!engine.has_any_role(Some(&agent), &[Role::Manager, Role::Engineer]));
        assert!(!engine.has_any_role(Some(&agent), &[]));
    }

    #[test]
    fn role_table_fidelity() {
        let engine = AuthzEngine::new();
        let agent = principal(Role::Agent);
        assert!(engine.has_permission(Some(&agent), "manage_tickets"));
        assert!(!engine.has_permission(Some(&agent), "manage_roles"));

        let customer = principal(Role::Customer);
        assert!(engine.has_permission(Some(&customer), "read"));
        assert!(!engine.has_permission(Some(&customer), "write"));
    }

    #[test]
    fn compound_action_maps_to_manage_resource() {
        let engine = AuthzEngine::new();
        let engineer = principal(Role::Engineer);
        // engineer holds manage_product_sales; the compound string itself
        // appears in no table
        assert!(engine.has_permission(Some(&engineer), "product_sales:create"));
        assert!(engine.has_permission(Some(&engineer), "product_sales.update"));
        assert!(engine.has_permission(Some(&engineer), "tickets:view"));
        assert!(!engine.has_permission(Some(&engineer), "contracts:approve"));
    }

    #[test]
    fn view_maps_to_manage_like_any_other_operation() {
        let engine = AuthzEngine::new();
        let manager = principal(Role::Manager);
        assert!(engine.has_permission(Some(&manager), "customers:view"));
        assert!(engine.has_permission(Some(&manager), "customers:view_details"));
        // agent manages no customers, so cannot even "view" via the compound path
        let agent = principal(Role::Agent);
        assert!(!engine.has_permission(Some(&agent), "customers:view"));
    }

    #[test]
    fn unparseable_action_denies() {
        let engine = AuthzEngine::new();
        let admin = principal(Role::Admin);
        assert!(!engine.has_permission(Some(&admin), "no_separator_here"));
        assert!(!engine.has_permission(Some(&admin), ":leading"));
        assert!(!engine.has_permission(Some(&admin), "trailing:"));
    }

    #[test]
    fn validate_role_permissions_fails_open_on_unmappable() {
        let engine = AuthzEngine::new();
        let customer = principal(Role::Customer);
        // unmappable: not in the catalog, no separator -> allowed
        assert!(engine.validate_role_permissions(Some(&customer), "totally_unknown"));
        // mappable but not granted -> normal denial
        assert!(!engine.validate_role_permissions(Some(&customer), "customers:update"));
        // known catalog permission not granted -> normal denial
        assert!(!engine.validate_role_permissions(Some(&customer), "manage_roles"));
        // granted -> allowed
        assert!(engine.validate_role_permissions(Some(&customer), "read"));
    }

    #[test]
    fn role_checks() {
        let engine = AuthzEngine::new();
        let manager = principal(Role::Manager);
        assert!(engine.has_role(Some(&manager), Role::Manager));
        assert!(!engine.has_role(Some(&manager), Role::Admin));
        assert!(engine.has_any_role(Some(&manager), &[Role::Admin, Role::Manager]));

        let root = principal(Role::SuperAdmin);
        assert!(engine.has_role(Some(&root), Role::Customer));
    }

    #[test]
    fn every_table_entry_is_in_the_catalog() {
        let engine = AuthzEngine::new();
        for role in Role::ALL {
            for perm in engine.role_permissions(role) {
                assert!(
                    crate::authz::permissions::is_known(perm),
                    "{perm} missing from catalog"
                );
            }
        }
    }
}
