use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed role enumeration. Roles are not editable at runtime; the
/// role -> permission tables in the engine are keyed off these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    Agent,
    Engineer,
    Customer,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Manager,
        Role::Agent,
        Role::Engineer,
        Role::Customer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Agent => "agent",
            Role::Engineer => "engineer",
            Role::Customer => "customer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == value.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

/// The authenticated user, materialized at login and held in the session
/// store for the lifetime of the session.
///
/// Invariants: `role == Role::SuperAdmin` iff `is_super_admin()`; `tenant_id`
/// is `None` only for platform-wide super admins.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub status: UserStatus,
    pub tenant_id: Option<Uuid>,
    /// Super admin browsing a tenant as one of its users.
    #[serde(default)]
    pub is_super_admin_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impersonated_as_user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impersonation_log_id: Option<Uuid>,
}

impl Principal {
    pub fn new(id: Uuid, email: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: display_name.into(),
            role,
            status: UserStatus::Active,
            tenant_id: None,
            is_super_admin_mode: false,
            impersonated_as_user_id: None,
            impersonation_log_id: None,
        }
    }

    pub fn with_tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub fn impersonating(mut self, as_user_id: Uuid, log_id: Uuid) -> Self {
        self.is_super_admin_mode = true;
        self.impersonated_as_user_id = Some(as_user_id);
        self.impersonation_log_id = Some(log_id);
        self
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.is_super_admin() || self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_satisfies_every_role_check() {
        let principal = Principal::new(Uuid::new_v4(), "root@example.com", "Root", Role::SuperAdmin);
        for role in Role::ALL {
            assert!(principal.has_role(role));
        }
    }

    #[test]
    fn plain_role_only_matches_itself() {
        let principal = Principal::new(Uuid::new_v4(), "a@example.com", "Agent", Role::Agent);
        assert!(principal.has_role(Role::Agent));
        assert!(!principal.has_role(Role::Admin));
        assert!(!principal.is_super_admin());
    }

    #[test]
    fn role_parse_round_trips() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("wizard"), None);
    }
}
