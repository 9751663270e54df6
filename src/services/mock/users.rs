use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::authz::{Role, UserStatus};
use crate::errors::{AppError, AppResult};
use crate::models::user::{UserAccount, UserCreateRequest, UserUpdateRequest};
use crate::services::UserService;
use crate::utils::utc_now;

use super::{demo_admin_user_id, demo_tenant_id};

pub struct MockUserService {
    users: RwLock<Vec<UserAccount>>,
}

impl MockUserService {
    pub fn seeded() -> Self {
        let now = utc_now();
        let tenant = demo_tenant_id();
        let seed = |id: Uuid, email: &str, name: &str, role: Role, tenant_id: Option<Uuid>| {
            UserAccount {
                id,
                tenant_id,
                email: email.to_string(),
                display_name: name.to_string(),
                role,
                status: UserStatus::Active,
                created_at: now,
                updated_at: now,
            }
        };

        let users = vec![
            seed(
                Uuid::from_u128(0x3000_0000_0000_0000_0000_0000_0000_0001),
                "root@example.com",
                "Platform Root",
                Role::SuperAdmin,
                None,
            ),
            seed(demo_admin_user_id(), "admin@example.com", "Demo Admin", Role::Admin, Some(tenant)),
            seed(
                Uuid::from_u128(0x3000_0000_0000_0000_0000_0000_0000_0003),
                "agent@example.com",
                "Demo Agent",
                Role::Agent,
                Some(tenant),
            ),
        ];
        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl UserService for MockUserService {
    async fn get_users(&self) -> AppResult<Vec<UserAccount>> {
        Ok(self.users.read().await.clone())
    }

    async fn get_user(&self, id: Uuid) -> AppResult<UserAccount> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("user not found"))
    }

    async fn create_user(&self, data: UserCreateRequest) -> AppResult<UserAccount> {
        let mut guard = self.users.write().await;
        if guard.iter().any(|u| u.email.eq_ignore_ascii_case(&data.email)) {
            return Err(AppError::conflict("email already in use"));
        }
        // tenant_id may only be absent for super admins
        if data.tenant_id.is_none() && data.role != Role::SuperAdmin {
            return Err(AppError::bad_request("tenant_id is required for tenant roles"));
        }

        let now = utc_now();
        let user = UserAccount {
            id: Uuid::new_v4(),
            tenant_id: data.tenant_id,
            email: data.email,
            display_name: data.display_name,
            role: data.role,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        guard.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, data: UserUpdateRequest) -> AppResult<UserAccount> {
        let mut guard = self.users.write().await;
        let user = guard
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("user not found"))?;

        if let Some(name) = data.display_name {
            user.display_name = name;
        }
        if let Some(role) = data.role {
            if role != Role::SuperAdmin && user.tenant_id.is_none() {
                return Err(AppError::bad_request(
                    "cannot demote a tenant-less user to a tenant role",
                ));
            }
            user.role = role;
        }
        if let Some(status) = data.status {
            user.status = status;
        }
        user.updated_at = utc_now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let mut guard = self.users.write().await;
        let before = guard.len();
        guard.retain(|u| u.id != id);
        if guard.len() == before {
            return Err(AppError::not_found("user not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tenant_roles_require_tenant() {
        let service = MockUserService::seeded();
        let err = service
            .create_user(UserCreateRequest {
                email: "new@example.com".into(),
                display_name: "New".into(),
                role: Role::Agent,
                tenant_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
