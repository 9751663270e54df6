use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::contract::{Contract, ContractCreateRequest, ContractUpdateRequest};
use crate::services::ContractService;

use super::{RestClient, TenantScoped};

pub struct RestContractService {
    client: Arc<RestClient>,
}

impl RestContractService {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContractService for RestContractService {
    async fn get_contracts(&self) -> AppResult<Vec<Contract>> {
        self.client.get_json("/api/contracts").await
    }

    async fn get_contract(&self, id: Uuid) -> AppResult<Contract> {
        self.client.get_json(&format!("/api/contracts/{id}")).await
    }

    async fn create_contract(
        &self,
        data: ContractCreateRequest,
        tenant_id: Uuid,
    ) -> AppResult<Contract> {
        self.client
            .post_json(
                "/api/contracts",
                &TenantScoped {
                    tenant_id,
                    data: &data,
                },
            )
            .await
    }

    async fn update_contract(&self, id: Uuid, data: ContractUpdateRequest) -> AppResult<Contract> {
        self.client
            .put_json(&format!("/api/contracts/{id}"), &data)
            .await
    }

    async fn delete_contract(&self, id: Uuid) -> AppResult<()> {
        self.client.delete(&format!("/api/contracts/{id}")).await
    }

    async fn approve_contract(&self, id: Uuid) -> AppResult<Contract> {
        self.client
            .post_json(&format!("/api/contracts/{id}/approve"), &())
            .await
    }
}
