use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::sale::{ProductSale, SaleCreateRequest, SaleStatus, SaleUpdateRequest};
use crate::services::SalesService;
use crate::utils::utc_now;

pub struct SupabaseSalesService {
    pool: PgPool,
}

impl SupabaseSalesService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbSale {
    id: Uuid,
    tenant_id: Uuid,
    customer_id: Uuid,
    product_name: String,
    amount: f64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(value: &str) -> SaleStatus {
    match value {
        "pending" => SaleStatus::Pending,
        "approved" => SaleStatus::Approved,
        "rejected" => SaleStatus::Rejected,
        "completed" => SaleStatus::Completed,
        _ => SaleStatus::Draft,
    }
}

fn status_str(status: SaleStatus) -> &'static str {
    match status {
        SaleStatus::Draft => "draft",
        SaleStatus::Pending => "pending",
        SaleStatus::Approved => "approved",
        SaleStatus::Rejected => "rejected",
        SaleStatus::Completed => "completed",
    }
}

impl From<DbSale> for ProductSale {
    fn from(db: DbSale) -> Self {
        ProductSale {
            id: db.id,
            tenant_id: db.tenant_id,
            customer_id: db.customer_id,
            product_name: db.product_name,
            amount: db.amount,
            status: parse_status(&db.status),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, tenant_id, customer_id, product_name, amount, status, created_at, updated_at";

#[async_trait]
impl SalesService for SupabaseSalesService {
    async fn get_product_sales(&self) -> AppResult<Vec<ProductSale>> {
        let rows = sqlx::query_as::<_, DbSale>(&format!(
            "SELECT {SELECT_COLUMNS} FROM product_sales ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ProductSale::from).collect())
    }

    async fn get_product_sale(&self, id: Uuid) -> AppResult<ProductSale> {
        let row = sqlx::query_as::<_, DbSale>(&format!(
            "SELECT {SELECT_COLUMNS} FROM product_sales WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("product sale not found"))?;
        Ok(row.into())
    }

    async fn create_product_sale(
        &self,
        data: SaleCreateRequest,
        tenant_id: Uuid,
    ) -> AppResult<ProductSale> {
        let id = Uuid::new_v4();
        let now = utc_now();

        sqlx::query(
            r#"
            INSERT INTO product_sales (id, tenant_id, customer_id, product_name, amount, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(data.customer_id)
        .bind(&data.product_name)
        .bind(data.amount)
        .bind(status_str(SaleStatus::Draft))
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(ProductSale {
            id,
            tenant_id,
            customer_id: data.customer_id,
            product_name: data.product_name,
            amount: data.amount,
            status: SaleStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_product_sale(
        &self,
        id: Uuid,
        data: SaleUpdateRequest,
    ) -> AppResult<ProductSale> {
        let row = sqlx::query_as::<_, DbSale>(&format!(
            r#"
            UPDATE product_sales SET
                product_name = COALESCE($2, product_name),
                amount = COALESCE($3, amount),
                updated_at = $4
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.product_name)
        .bind(data.amount)
        .bind(utc_now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("product sale not found"))?;
        Ok(row.into())
    }

    async fn delete_product_sale(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM product_sales WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("product sale not found"));
        }
        Ok(())
    }

    async fn change_status(&self, id: Uuid, status: SaleStatus) -> AppResult<ProductSale> {
        let row = sqlx::query_as::<_, DbSale>(&format!(
            "UPDATE product_sales SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {SELECT_COLUMNS}"
        ))
        .bind(id)
        .bind(status_str(status))
        .bind(utc_now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("product sale not found"))?;
        Ok(row.into())
    }
}
