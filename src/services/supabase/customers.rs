use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::customer::{
    Customer, CustomerCreateRequest, CustomerExport, CustomerFilters, CustomerStatus,
    CustomerUpdateRequest,
};
use crate::services::CustomerService;
use crate::utils::utc_now;

pub struct SupabaseCustomerService {
    pool: PgPool,
}

impl SupabaseCustomerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbCustomer {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    industry: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(value: &str) -> CustomerStatus {
    match value {
        "active" => CustomerStatus::Active,
        "churned" => CustomerStatus::Churned,
        _ => CustomerStatus::Prospect,
    }
}

fn status_str(status: CustomerStatus) -> &'static str {
    match status {
        CustomerStatus::Prospect => "prospect",
        CustomerStatus::Active => "active",
        CustomerStatus::Churned => "churned",
    }
}

impl From<DbCustomer> for Customer {
    fn from(db: DbCustomer) -> Self {
        Customer {
            id: db.id,
            tenant_id: db.tenant_id,
            name: db.name,
            email: db.email,
            phone: db.phone,
            industry: db.industry,
            status: parse_status(&db.status),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, tenant_id, name, email, phone, industry, status, created_at, updated_at";

#[async_trait]
impl CustomerService for SupabaseCustomerService {
    async fn get_customers(&self, filters: CustomerFilters) -> AppResult<Vec<Customer>> {
        let search = filters.search.map(|s| format!("%{}%", s.to_lowercase()));
        let status = filters.status.map(status_str);

        let rows = sqlx::query_as::<_, DbCustomer>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM customers
            WHERE ($1::text IS NULL OR lower(name) LIKE $1 OR lower(email) LIKE $1)
              AND ($2::text IS NULL OR industry = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY name
            "#
        ))
        .bind(search)
        .bind(filters.industry)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, DbCustomer>(&format!(
            "SELECT {SELECT_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("customer not found"))?;

        Ok(row.into())
    }

    async fn create_customer(
        &self,
        data: CustomerCreateRequest,
        tenant_id: Uuid,
    ) -> AppResult<Customer> {
        let id = Uuid::new_v4();
        let now = utc_now();

        sqlx::query(
            r#"
            INSERT INTO customers (id, tenant_id, name, email, phone, industry, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.industry)
        .bind(status_str(CustomerStatus::Prospect))
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Customer {
            id,
            tenant_id,
            name: data.name,
            email: data.email,
            phone: data.phone,
            industry: data.industry,
            status: CustomerStatus::Prospect,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_customer(&self, id: Uuid, data: CustomerUpdateRequest) -> AppResult<Customer> {
        let now = utc_now();
        let row = sqlx::query_as::<_, DbCustomer>(&format!(
            r#"
            UPDATE customers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                industry = COALESCE($5, industry),
                status = COALESCE($6, status),
                updated_at = $7
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.industry)
        .bind(data.status.map(status_str))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("customer not found"))?;

        Ok(row.into())
    }

    async fn delete_customer(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("customer not found"));
        }
        Ok(())
    }

    async fn bulk_delete_customers(&self, ids: Vec<Uuid>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn export_customers(&self) -> AppResult<CustomerExport> {
        let customers = self.get_customers(CustomerFilters::default()).await?;
        let mut csv = String::from("id,name,email,industry,status\n");
        for c in &customers {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                c.id,
                c.name,
                c.email,
                c.industry.as_deref().unwrap_or(""),
                status_str(c.status)
            ));
        }
        Ok(CustomerExport {
            generated_at: utc_now(),
            count: customers.len(),
            csv,
        })
    }

    async fn get_industries(&self) -> AppResult<Vec<String>> {
        let industries: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT industry FROM customers WHERE industry IS NOT NULL ORDER BY industry",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(industries)
    }
}
