use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::contract::{
    Contract, ContractCreateRequest, ContractStatus, ContractUpdateRequest,
};
use crate::services::ContractService;
use crate::utils::utc_now;

pub struct SupabaseContractService {
    pool: PgPool,
}

impl SupabaseContractService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbContract {
    id: Uuid,
    tenant_id: Uuid,
    customer_id: Uuid,
    title: String,
    value: f64,
    status: String,
    starts_on: DateTime<Utc>,
    ends_on: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(value: &str) -> ContractStatus {
    match value {
        "pending_approval" => ContractStatus::PendingApproval,
        "active" => ContractStatus::Active,
        "expired" => ContractStatus::Expired,
        "rejected" => ContractStatus::Rejected,
        _ => ContractStatus::Draft,
    }
}

fn status_str(status: ContractStatus) -> &'static str {
    match status {
        ContractStatus::Draft => "draft",
        ContractStatus::PendingApproval => "pending_approval",
        ContractStatus::Active => "active",
        ContractStatus::Expired => "expired",
        ContractStatus::Rejected => "rejected",
    }
}

impl From<DbContract> for Contract {
    fn from(db: DbContract) -> Self {
        Contract {
            id: db.id,
            tenant_id: db.tenant_id,
            customer_id: db.customer_id,
            title: db.title,
            value: db.value,
            status: parse_status(&db.status),
            starts_on: db.starts_on,
            ends_on: db.ends_on,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, tenant_id, customer_id, title, value, status, starts_on, ends_on, created_at, updated_at";

#[async_trait]
impl ContractService for SupabaseContractService {
    async fn get_contracts(&self) -> AppResult<Vec<Contract>> {
        let rows = sqlx::query_as::<_, DbContract>(&format!(
            "SELECT {SELECT_COLUMNS} FROM contracts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Contract::from).collect())
    }

    async fn get_contract(&self, id: Uuid) -> AppResult<Contract> {
        let row = sqlx::query_as::<_, DbContract>(&format!(
            "SELECT {SELECT_COLUMNS} FROM contracts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("contract not found"))?;
        Ok(row.into())
    }

    async fn create_contract(
        &self,
        data: ContractCreateRequest,
        tenant_id: Uuid,
    ) -> AppResult<Contract> {
        let id = Uuid::new_v4();
        let now = utc_now();

        sqlx::query(
            r#"
            INSERT INTO contracts (id, tenant_id, customer_id, title, value, status, starts_on, ends_on, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(data.customer_id)
        .bind(&data.title)
        .bind(data.value)
        .bind(status_str(ContractStatus::Draft))
        .bind(data.starts_on)
        .bind(data.ends_on)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Contract {
            id,
            tenant_id,
            customer_id: data.customer_id,
            title: data.title,
            value: data.value,
            status: ContractStatus::Draft,
            starts_on: data.starts_on,
            ends_on: data.ends_on,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_contract(&self, id: Uuid, data: ContractUpdateRequest) -> AppResult<Contract> {
        let row = sqlx::query_as::<_, DbContract>(&format!(
            r#"
            UPDATE contracts SET
                title = COALESCE($2, title),
                value = COALESCE($3, value),
                ends_on = COALESCE($4, ends_on),
                updated_at = $5
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.value)
        .bind(data.ends_on)
        .bind(utc_now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("contract not found"))?;
        Ok(row.into())
    }

    async fn delete_contract(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("contract not found"));
        }
        Ok(())
    }

    async fn approve_contract(&self, id: Uuid) -> AppResult<Contract> {
        // Approval is only legal from pending_approval; the guard lives in
        // the WHERE clause so concurrent approvals cannot double-fire.
        let row = sqlx::query_as::<_, DbContract>(&format!(
            r#"
            UPDATE contracts SET status = 'active', updated_at = $2
            WHERE id = $1 AND status = 'pending_approval'
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(utc_now())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(db) => Ok(db.into()),
            None => {
                // Distinguish missing from wrong-state for the caller.
                self.get_contract(id).await?;
                Err(AppError::bad_request(
                    "contract is not pending approval",
                ))
            }
        }
    }
}
