//! Published service interfaces.
//!
//! One trait per logical service name. These are the only contracts a
//! concrete backend must implement to be pluggable; the registry hands them
//! out as trait objects and callers never see the concrete type. Backend
//! errors propagate through unchanged.

pub mod mock;
pub mod rest;
pub mod supabase;

use async_trait::async_trait;
use uuid::Uuid;

use crate::authz::Principal;
use crate::errors::AppResult;
use crate::models::audit::{AuditEntry, AuditRecord};
use crate::models::contract::{Contract, ContractCreateRequest, ContractUpdateRequest};
use crate::models::customer::{
    Customer, CustomerCreateRequest, CustomerExport, CustomerFilters, CustomerUpdateRequest,
};
use crate::models::dashboard::{ActivityItem, DashboardStats};
use crate::models::file::StoredFile;
use crate::models::notification::Notification;
use crate::models::sale::{ProductSale, SaleCreateRequest, SaleStatus, SaleUpdateRequest};
use crate::models::ticket::{Ticket, TicketCreateRequest, TicketUpdateRequest};
use crate::models::user::{UserAccount, UserCreateRequest, UserUpdateRequest};

/// Credential verification and principal materialization. Mock-only: there
/// is no real or supabase implementation regardless of configured mode.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> AppResult<Principal>;
    async fn logout(&self, user_id: Uuid) -> AppResult<()>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Principal>>;
}

#[async_trait]
pub trait CustomerService: Send + Sync {
    async fn get_customers(&self, filters: CustomerFilters) -> AppResult<Vec<Customer>>;
    async fn get_customer(&self, id: Uuid) -> AppResult<Customer>;
    async fn create_customer(&self, data: CustomerCreateRequest, tenant_id: Uuid) -> AppResult<Customer>;
    async fn update_customer(&self, id: Uuid, data: CustomerUpdateRequest) -> AppResult<Customer>;
    async fn delete_customer(&self, id: Uuid) -> AppResult<()>;
    async fn bulk_delete_customers(&self, ids: Vec<Uuid>) -> AppResult<u64>;
    async fn export_customers(&self) -> AppResult<CustomerExport>;
    async fn get_industries(&self) -> AppResult<Vec<String>>;
}

#[async_trait]
pub trait SalesService: Send + Sync {
    async fn get_product_sales(&self) -> AppResult<Vec<ProductSale>>;
    async fn get_product_sale(&self, id: Uuid) -> AppResult<ProductSale>;
    async fn create_product_sale(&self, data: SaleCreateRequest, tenant_id: Uuid) -> AppResult<ProductSale>;
    async fn update_product_sale(&self, id: Uuid, data: SaleUpdateRequest) -> AppResult<ProductSale>;
    async fn delete_product_sale(&self, id: Uuid) -> AppResult<()>;
    async fn change_status(&self, id: Uuid, status: SaleStatus) -> AppResult<ProductSale>;
}

#[async_trait]
pub trait TicketService: Send + Sync {
    async fn get_tickets(&self) -> AppResult<Vec<Ticket>>;
    async fn get_ticket(&self, id: Uuid) -> AppResult<Ticket>;
    async fn create_ticket(&self, data: TicketCreateRequest, tenant_id: Uuid) -> AppResult<Ticket>;
    async fn update_ticket(&self, id: Uuid, data: TicketUpdateRequest) -> AppResult<Ticket>;
    async fn delete_ticket(&self, id: Uuid) -> AppResult<()>;
    async fn assign_ticket(&self, id: Uuid, assignee_id: Uuid) -> AppResult<Ticket>;
}

#[async_trait]
pub trait ContractService: Send + Sync {
    async fn get_contracts(&self) -> AppResult<Vec<Contract>>;
    async fn get_contract(&self, id: Uuid) -> AppResult<Contract>;
    async fn create_contract(&self, data: ContractCreateRequest, tenant_id: Uuid) -> AppResult<Contract>;
    async fn update_contract(&self, id: Uuid, data: ContractUpdateRequest) -> AppResult<Contract>;
    async fn delete_contract(&self, id: Uuid) -> AppResult<()>;
    async fn approve_contract(&self, id: Uuid) -> AppResult<Contract>;
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_users(&self) -> AppResult<Vec<UserAccount>>;
    async fn get_user(&self, id: Uuid) -> AppResult<UserAccount>;
    async fn create_user(&self, data: UserCreateRequest) -> AppResult<UserAccount>;
    async fn update_user(&self, id: Uuid, data: UserUpdateRequest) -> AppResult<UserAccount>;
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn get_stats(&self) -> AppResult<DashboardStats>;
    async fn get_recent_activity(&self, limit: usize) -> AppResult<Vec<ActivityItem>>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn get_notifications(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;
    async fn mark_read(&self, id: Uuid) -> AppResult<Notification>;
    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64>;
    async fn delete_notification(&self, id: Uuid) -> AppResult<()>;
}

/// Mock-only, like `AuthBackend`.
#[async_trait]
pub trait FileService: Send + Sync {
    async fn upload_file(
        &self,
        name: String,
        content_type: String,
        size_bytes: u64,
        uploaded_by: Uuid,
    ) -> AppResult<StoredFile>;
    async fn list_files(&self) -> AppResult<Vec<StoredFile>>;
    async fn delete_file(&self, id: Uuid) -> AppResult<()>;
}

/// Mock-only. Entries form a SHA-256 hash chain; `verify_chain` walks it.
#[async_trait]
pub trait AuditService: Send + Sync {
    async fn record(&self, record: AuditRecord) -> AppResult<AuditEntry>;
    async fn get_entries(&self, limit: usize) -> AppResult<Vec<AuditEntry>>;
    async fn verify_chain(&self) -> AppResult<bool>;
}
