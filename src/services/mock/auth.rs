use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::authz::{Principal, Role, UserStatus};
use crate::errors::{AppError, AppResult};
use crate::services::AuthBackend;
use crate::utils::{hash_password, verify_password};

use super::{demo_admin_user_id, demo_tenant_id};

struct Credential {
    principal: Principal,
    password_hash: String,
}

/// Demo credential store: one user per role, all sharing the password
/// `password123`. Super admin has no tenant; everyone else belongs to the
/// demo tenant.
pub struct MockAuthBackend {
    credentials: RwLock<Vec<Credential>>,
}

impl MockAuthBackend {
    pub fn seeded() -> Self {
        // One hash shared across the demo users; they all use the same
        // password anyway and hashing per-user slows construction noticeably.
        let shared_hash =
            hash_password("password123").unwrap_or_else(|_| String::from("!invalid"));
        let tenant = demo_tenant_id();

        let mut users = vec![Principal::new(
            Uuid::from_u128(0x3000_0000_0000_0000_0000_0000_0000_0001),
            "root@example.com",
            "Platform Root",
            Role::SuperAdmin,
        )];

        let tenant_users = [
            (demo_admin_user_id(), "admin@example.com", "Demo Admin", Role::Admin),
            (
                Uuid::from_u128(0x3000_0000_0000_0000_0000_0000_0000_0002),
                "manager@example.com",
                "Demo Manager",
                Role::Manager,
            ),
            (
                Uuid::from_u128(0x3000_0000_0000_0000_0000_0000_0000_0003),
                "agent@example.com",
                "Demo Agent",
                Role::Agent,
            ),
            (
                Uuid::from_u128(0x3000_0000_0000_0000_0000_0000_0000_0004),
                "engineer@example.com",
                "Demo Engineer",
                Role::Engineer,
            ),
            (
                Uuid::from_u128(0x3000_0000_0000_0000_0000_0000_0000_0005),
                "customer@example.com",
                "Demo Customer",
                Role::Customer,
            ),
        ];
        for (id, email, name, role) in tenant_users {
            users.push(Principal::new(id, email, name, role).with_tenant(tenant));
        }

        let credentials = users
            .into_iter()
            .map(|principal| Credential {
                principal,
                password_hash: shared_hash.clone(),
            })
            .collect();

        Self {
            credentials: RwLock::new(credentials),
        }
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn login(&self, email: &str, password: &str) -> AppResult<Principal> {
        let guard = self.credentials.read().await;
        let credential = guard
            .iter()
            .find(|c| c.principal.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| AppError::unauthorized("invalid credentials"))?;

        if !verify_password(password, &credential.password_hash)? {
            return Err(AppError::unauthorized("invalid credentials"));
        }

        if credential.principal.status != UserStatus::Active {
            return Err(AppError::unauthorized("account is not active"));
        }

        Ok(credential.principal.clone())
    }

    async fn logout(&self, user_id: Uuid) -> AppResult<()> {
        tracing::debug!(%user_id, "mock logout");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Principal>> {
        let guard = self.credentials.read().await;
        Ok(guard
            .iter()
            .find(|c| c.principal.email.eq_ignore_ascii_case(email))
            .map(|c| c.principal.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_with_demo_credentials() {
        let backend = MockAuthBackend::seeded();
        let principal = backend.login("admin@example.com", "password123").await.unwrap();
        assert_eq!(principal.role, Role::Admin);
        assert!(principal.tenant_id.is_some());
    }

    #[tokio::test]
    async fn super_admin_has_no_tenant() {
        let backend = MockAuthBackend::seeded();
        let principal = backend.login("root@example.com", "password123").await.unwrap();
        assert!(principal.is_super_admin());
        assert!(principal.tenant_id.is_none());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let backend = MockAuthBackend::seeded();
        let err = backend.login("admin@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let backend = MockAuthBackend::seeded();
        let err = backend.login("ghost@example.com", "password123").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
