use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub customers: u64,
    pub open_tickets: u64,
    pub active_contracts: u64,
    pub total_sales_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityItem {
    pub id: Uuid,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}
