use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::user::{UserAccount, UserCreateRequest, UserUpdateRequest};
use crate::services::UserService;

use super::RestClient;

pub struct RestUserService {
    client: Arc<RestClient>,
}

impl RestUserService {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserService for RestUserService {
    async fn get_users(&self) -> AppResult<Vec<UserAccount>> {
        self.client.get_json("/api/users").await
    }

    async fn get_user(&self, id: Uuid) -> AppResult<UserAccount> {
        self.client.get_json(&format!("/api/users/{id}")).await
    }

    async fn create_user(&self, data: UserCreateRequest) -> AppResult<UserAccount> {
        self.client.post_json("/api/users", &data).await
    }

    async fn update_user(&self, id: Uuid, data: UserUpdateRequest) -> AppResult<UserAccount> {
        self.client.put_json(&format!("/api/users/{id}"), &data).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.client.delete(&format!("/api/users/{id}")).await
    }
}
