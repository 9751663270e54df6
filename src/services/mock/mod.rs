//! In-memory backends with seeded demo data.
//!
//! These are the safe default every unresolvable configuration degrades to.
//! Instance state lives behind `RwLock`s inside the instance itself, which is
//! why the registry must hand out the same `Arc` for a whole configuration
//! epoch: two instances would mean two divergent datasets.

mod audit;
mod auth;
mod contracts;
mod customers;
mod dashboard;
mod files;
mod notifications;
mod sales;
mod tickets;
mod users;

pub use audit::MockAuditService;
pub use auth::MockAuthBackend;
pub use contracts::MockContractService;
pub use customers::MockCustomerService;
pub use dashboard::MockDashboardService;
pub use files::MockFileService;
pub use notifications::MockNotificationService;
pub use sales::MockSalesService;
pub use tickets::MockTicketService;
pub use users::MockUserService;

use uuid::Uuid;

/// Tenant all seeded demo records belong to.
pub fn demo_tenant_id() -> Uuid {
    Uuid::from_u128(0x1111_1111_1111_1111_1111_1111_1111_1111)
}

/// Stable ids for seeded records so integration tests can reference them.
pub fn demo_customer_id() -> Uuid {
    Uuid::from_u128(0x2222_2222_2222_2222_2222_2222_2222_2222)
}

pub fn demo_admin_user_id() -> Uuid {
    Uuid::from_u128(0x3333_3333_3333_3333_3333_3333_3333_3333)
}
