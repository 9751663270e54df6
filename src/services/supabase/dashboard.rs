use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::dashboard::{ActivityItem, DashboardStats};
use crate::services::DashboardService;

pub struct SupabaseDashboardService {
    pool: PgPool,
}

impl SupabaseDashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DbActivity {
    id: Uuid,
    description: String,
    occurred_at: DateTime<Utc>,
}

#[async_trait]
impl DashboardService for SupabaseDashboardService {
    async fn get_stats(&self) -> AppResult<DashboardStats> {
        let customers: i64 = sqlx::query_scalar("SELECT count(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        let open_tickets: i64 =
            sqlx::query_scalar("SELECT count(*) FROM tickets WHERE status IN ('open', 'in_progress')")
                .fetch_one(&self.pool)
                .await?;
        let active_contracts: i64 =
            sqlx::query_scalar("SELECT count(*) FROM contracts WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;
        let total_sales_amount: f64 = sqlx::query_scalar(
            "SELECT coalesce(sum(amount), 0) FROM product_sales WHERE status IN ('approved', 'completed')",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            customers: customers as u64,
            open_tickets: open_tickets as u64,
            active_contracts: active_contracts as u64,
            total_sales_amount,
        })
    }

    async fn get_recent_activity(&self, limit: usize) -> AppResult<Vec<ActivityItem>> {
        let rows = sqlx::query_as::<_, DbActivity>(
            r#"
            SELECT id, description, occurred_at FROM activity_feed
            ORDER BY occurred_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ActivityItem {
                id: row.id,
                description: row.description,
                occurred_at: row.occurred_at,
            })
            .collect())
    }
}
