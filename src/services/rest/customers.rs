use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::customer::{
    Customer, CustomerCreateRequest, CustomerExport, CustomerFilters, CustomerUpdateRequest,
};
use crate::services::CustomerService;

use super::{RestClient, TenantScoped};

pub struct RestCustomerService {
    client: Arc<RestClient>,
}

impl RestCustomerService {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CustomerService for RestCustomerService {
    async fn get_customers(&self, filters: CustomerFilters) -> AppResult<Vec<Customer>> {
        self.client
            .get_json_with_query("/api/customers", &filters)
            .await
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Customer> {
        self.client.get_json(&format!("/api/customers/{id}")).await
    }

    async fn create_customer(
        &self,
        data: CustomerCreateRequest,
        tenant_id: Uuid,
    ) -> AppResult<Customer> {
        self.client
            .post_json(
                "/api/customers",
                &TenantScoped {
                    tenant_id,
                    data: &data,
                },
            )
            .await
    }

    async fn update_customer(&self, id: Uuid, data: CustomerUpdateRequest) -> AppResult<Customer> {
        self.client
            .put_json(&format!("/api/customers/{id}"), &data)
            .await
    }

    async fn delete_customer(&self, id: Uuid) -> AppResult<()> {
        self.client.delete(&format!("/api/customers/{id}")).await
    }

    async fn bulk_delete_customers(&self, ids: Vec<Uuid>) -> AppResult<u64> {
        #[derive(serde::Serialize)]
        struct Body {
            ids: Vec<Uuid>,
        }
        #[derive(serde::Deserialize)]
        struct Deleted {
            deleted: u64,
        }
        let result: Deleted = self
            .client
            .post_json("/api/customers/bulk-delete", &Body { ids })
            .await?;
        Ok(result.deleted)
    }

    async fn export_customers(&self) -> AppResult<CustomerExport> {
        self.client.get_json("/api/customers/export").await
    }

    async fn get_industries(&self) -> AppResult<Vec<String>> {
        self.client.get_json("/api/customers/industries").await
    }
}
