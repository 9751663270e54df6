use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::sale::{
    ProductSale, SaleCreateRequest, SaleStatus, SaleStatusRequest, SaleUpdateRequest,
};
use crate::services::SalesService;

use super::{RestClient, TenantScoped};

pub struct RestSalesService {
    client: Arc<RestClient>,
}

impl RestSalesService {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SalesService for RestSalesService {
    async fn get_product_sales(&self) -> AppResult<Vec<ProductSale>> {
        self.client.get_json("/api/product-sales").await
    }

    async fn get_product_sale(&self, id: Uuid) -> AppResult<ProductSale> {
        self.client.get_json(&format!("/api/product-sales/{id}")).await
    }

    async fn create_product_sale(
        &self,
        data: SaleCreateRequest,
        tenant_id: Uuid,
    ) -> AppResult<ProductSale> {
        self.client
            .post_json(
                "/api/product-sales",
                &TenantScoped {
                    tenant_id,
                    data: &data,
                },
            )
            .await
    }

    async fn update_product_sale(
        &self,
        id: Uuid,
        data: SaleUpdateRequest,
    ) -> AppResult<ProductSale> {
        self.client
            .put_json(&format!("/api/product-sales/{id}"), &data)
            .await
    }

    async fn delete_product_sale(&self, id: Uuid) -> AppResult<()> {
        self.client.delete(&format!("/api/product-sales/{id}")).await
    }

    async fn change_status(&self, id: Uuid, status: SaleStatus) -> AppResult<ProductSale> {
        self.client
            .put_json(
                &format!("/api/product-sales/{id}/status"),
                &SaleStatusRequest { status },
            )
            .await
    }
}
