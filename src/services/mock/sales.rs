use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::sale::{ProductSale, SaleCreateRequest, SaleStatus, SaleUpdateRequest};
use crate::services::SalesService;
use crate::utils::utc_now;

use super::{demo_customer_id, demo_tenant_id};

pub struct MockSalesService {
    sales: RwLock<Vec<ProductSale>>,
}

impl MockSalesService {
    pub fn seeded() -> Self {
        let now = utc_now();
        let sales = vec![
            ProductSale {
                id: Uuid::from_u128(0x4000_0000_0000_0000_0000_0000_0000_0001),
                tenant_id: demo_tenant_id(),
                customer_id: demo_customer_id(),
                product_name: "Enterprise License".into(),
                amount: 24_000.0,
                status: SaleStatus::Approved,
                created_at: now,
                updated_at: now,
            },
            ProductSale {
                id: Uuid::from_u128(0x4000_0000_0000_0000_0000_0000_0000_0002),
                tenant_id: demo_tenant_id(),
                customer_id: demo_customer_id(),
                product_name: "Support Package".into(),
                amount: 3_500.0,
                status: SaleStatus::Pending,
                created_at: now,
                updated_at: now,
            },
        ];
        Self {
            sales: RwLock::new(sales),
        }
    }
}

#[async_trait]
impl SalesService for MockSalesService {
    async fn get_product_sales(&self) -> AppResult<Vec<ProductSale>> {
        Ok(self.sales.read().await.clone())
    }

    async fn get_product_sale(&self, id: Uuid) -> AppResult<ProductSale> {
        self.sales
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("product sale not found"))
    }

    async fn create_product_sale(
        &self,
        data: SaleCreateRequest,
        tenant_id: Uuid,
    ) -> AppResult<ProductSale> {
        let now = utc_now();
        let sale = ProductSale {
            id: Uuid::new_v4(),
            tenant_id,
            customer_id: data.customer_id,
            product_name: data.product_name,
            amount: data.amount,
            status: SaleStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        self.sales.write().await.push(sale.clone());
        Ok(sale)
    }

    async fn update_product_sale(
        &self,
        id: Uuid,
        data: SaleUpdateRequest,
    ) -> AppResult<ProductSale> {
        let mut guard = self.sales.write().await;
        let sale = guard
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::not_found("product sale not found"))?;

        if let Some(name) = data.product_name {
            sale.product_name = name;
        }
        if let Some(amount) = data.amount {
            sale.amount = amount;
        }
        sale.updated_at = utc_now();
        Ok(sale.clone())
    }

    async fn delete_product_sale(&self, id: Uuid) -> AppResult<()> {
        let mut guard = self.sales.write().await;
        let before = guard.len();
        guard.retain(|s| s.id != id);
        if guard.len() == before {
            return Err(AppError::not_found("product sale not found"));
        }
        Ok(())
    }

    async fn change_status(&self, id: Uuid, status: SaleStatus) -> AppResult<ProductSale> {
        let mut guard = self.sales.write().await;
        let sale = guard
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::not_found("product sale not found"))?;
        sale.status = status;
        sale.updated_at = utc_now();
        Ok(sale.clone())
    }
}
