//! Supabase-backed service implementations.
//!
//! Supabase is plain Postgres underneath, so these backends talk to it with
//! sqlx against an externally-owned schema (the schema itself is not managed
//! here; there are no migrations in this repo). The pool is created with
//! `connect_lazy` so backend construction stays synchronous and never fails
//! at resolution time; connection errors surface on first query as
//! `AppError::Database` like any other backend data error.

mod contracts;
mod customers;
mod dashboard;
mod notifications;
mod sales;
mod tickets;
mod users;

pub use contracts::SupabaseContractService;
pub use customers::SupabaseCustomerService;
pub use dashboard::SupabaseDashboardService;
pub use notifications::SupabaseNotificationService;
pub use sales::SupabaseSalesService;
pub use tickets::SupabaseTicketService;
pub use users::SupabaseUserService;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub fn connect_lazy(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_lazy(database_url)
}
