use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::dashboard::{ActivityItem, DashboardStats};
use crate::services::DashboardService;
use crate::utils::utc_now;

/// Static dashboard figures consistent with the other seeded mock stores.
pub struct MockDashboardService;

impl MockDashboardService {
    pub fn seeded() -> Self {
        Self
    }
}

#[async_trait]
impl DashboardService for MockDashboardService {
    async fn get_stats(&self) -> AppResult<DashboardStats> {
        Ok(DashboardStats {
            customers: 3,
            open_tickets: 1,
            active_contracts: 1,
            total_sales_amount: 27_500.0,
        })
    }

    async fn get_recent_activity(&self, limit: usize) -> AppResult<Vec<ActivityItem>> {
        let now = utc_now();
        let items = vec![
            ActivityItem {
                id: Uuid::from_u128(0x7000_0000_0000_0000_0000_0000_0000_0001),
                description: "Contract approved for Acme Corp".into(),
                occurred_at: now - Duration::hours(2),
            },
            ActivityItem {
                id: Uuid::from_u128(0x7000_0000_0000_0000_0000_0000_0000_0002),
                description: "Ticket resolved: Invoice discrepancy".into(),
                occurred_at: now - Duration::hours(5),
            },
            ActivityItem {
                id: Uuid::from_u128(0x7000_0000_0000_0000_0000_0000_0000_0003),
                description: "New prospect: Globex".into(),
                occurred_at: now - Duration::days(1),
            },
        ];
        Ok(items.into_iter().take(limit).collect())
    }
}
