//! Backend resolution and caching.
//!
//! The registry owns one cached trait-object slot per logical service. A
//! slot is filled on first access according to the effective backend mode
//! and handed out as the same `Arc` until the configuration changes, at
//! which point every slot is dropped and the next access rebuilds against
//! the new mode. Resolution is synchronous and never fails: any mode that
//! cannot be honored (missing connection URL, no implementation for that
//! service) degrades to the in-memory mock with a warning.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::Serialize;
use sqlx::PgPool;
use tokio::time::MissedTickBehavior;
use utoipa::ToSchema;

use crate::config::{BackendConfig, BackendMode, ServiceName};
use crate::services::mock::{
    MockAuditService, MockAuthBackend, MockContractService, MockCustomerService,
    MockDashboardService, MockFileService, MockNotificationService, MockSalesService,
    MockTicketService, MockUserService,
};
use crate::services::rest::{
    RestClient, RestContractService, RestCustomerService, RestSalesService, RestTicketService,
    RestUserService,
};
use crate::services::supabase::{
    self, SupabaseContractService, SupabaseCustomerService, SupabaseDashboardService,
    SupabaseNotificationService, SupabaseSalesService, SupabaseTicketService, SupabaseUserService,
};
use crate::services::{
    AuditService, AuthBackend, ContractService, CustomerService, DashboardService, FileService,
    NotificationService, SalesService, TicketService, UserService,
};

/// A lazily-filled cache cell for one service's trait object.
struct Slot<S: ?Sized> {
    cell: RwLock<Option<Arc<S>>>,
}

impl<S: ?Sized> Slot<S> {
    fn new() -> Self {
        Self {
            cell: RwLock::new(None),
        }
    }

    fn get_or_init(&self, build: impl FnOnce() -> Arc<S>) -> Arc<S> {
        if let Some(existing) = self
            .cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return existing;
        }
        let mut guard = self.cell.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = guard.clone() {
            return existing;
        }
        let built = build();
        *guard = Some(Arc::clone(&built));
        built
    }

    fn clear(&self) {
        self.cell
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Resolved view of one service, for the admin surface. `backend` is what
/// actually serves requests, which differs from `mode` when resolution
/// degraded to mock.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceBackendStatus {
    pub service: &'static str,
    pub mode: &'static str,
    pub backend: &'static str,
}

pub struct ServiceRegistry {
    config: RwLock<BackendConfig>,

    auth: Slot<dyn AuthBackend>,
    customers: Slot<dyn CustomerService>,
    sales: Slot<dyn SalesService>,
    tickets: Slot<dyn TicketService>,
    contracts: Slot<dyn ContractService>,
    users: Slot<dyn UserService>,
    dashboard: Slot<dyn DashboardService>,
    notifications: Slot<dyn NotificationService>,
    files: Slot<dyn FileService>,
    audit: Slot<dyn AuditService>,

    // Shared plumbing reused by every backend of the same family within one
    // configuration epoch.
    pg_pool: RwLock<Option<PgPool>>,
    rest_client: RwLock<Option<Arc<RestClient>>>,
}

impl ServiceRegistry {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config: RwLock::new(config),
            auth: Slot::new(),
            customers: Slot::new(),
            sales: Slot::new(),
            tickets: Slot::new(),
            contracts: Slot::new(),
            users: Slot::new(),
            dashboard: Slot::new(),
            notifications: Slot::new(),
            files: Slot::new(),
            audit: Slot::new(),
            pg_pool: RwLock::new(None),
            rest_client: RwLock::new(None),
        }
    }

    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env())
    }

    pub fn current_config(&self) -> BackendConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn effective_mode(&self, name: ServiceName) -> BackendMode {
        self.current_config().effective_mode(name)
    }

    /// Change the global mode. Cache invalidation happens before this
    /// returns, so the next resolution already sees the new mode.
    pub fn set_mode(&self, mode: BackendMode) {
        {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            config.global_mode = mode;
        }
        tracing::info!(mode = mode.as_str(), "global backend mode changed");
        self.invalidate_all();
    }

    /// Pin one service to a mode independent of the global default.
    pub fn set_override(&self, name: ServiceName, mode: BackendMode) {
        {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            config.overrides.insert(name, mode);
        }
        tracing::info!(
            service = name.as_str(),
            mode = mode.as_str(),
            "backend override set"
        );
        self.invalidate_all();
    }

    pub fn clear_override(&self, name: ServiceName) {
        let removed = {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            config.overrides.remove(&name).is_some()
        };
        if removed {
            tracing::info!(service = name.as_str(), "backend override cleared");
            self.invalidate_all();
        }
    }

    /// Adopt a freshly-read configuration. Returns whether anything changed
    /// (and therefore whether the caches were invalidated).
    pub fn refresh_from(&self, fresh: BackendConfig) -> bool {
        {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            if *config == fresh {
                return false;
            }
            *config = fresh;
        }
        self.invalidate_all();
        true
    }

    fn invalidate_all(&self) {
        self.auth.clear();
        self.customers.clear();
        self.sales.clear();
        self.tickets.clear();
        self.contracts.clear();
        self.users.clear();
        self.dashboard.clear();
        self.notifications.clear();
        self.files.clear();
        self.audit.clear();
        self.pg_pool
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.rest_client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn pool(&self) -> Option<PgPool> {
        if let Some(pool) = self
            .pg_pool
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Some(pool);
        }
        let url = self.current_config().supabase_db_url?;
        let mut guard = self.pg_pool.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(pool) = guard.clone() {
            return Some(pool);
        }
        match supabase::connect_lazy(&url) {
            Ok(pool) => {
                *guard = Some(pool.clone());
                Some(pool)
            }
            Err(err) => {
                tracing::warn!(error = %err, "invalid SUPABASE_DB_URL, degrading to mock");
                None
            }
        }
    }

    fn rest(&self) -> Option<Arc<RestClient>> {
        if let Some(client) = self
            .rest_client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Some(client);
        }
        let base_url = match self.current_config().real_api_base_url {
            Some(url) => url,
            None => {
                tracing::warn!("REAL_API_BASE_URL not set, degrading to mock");
                return None;
            }
        };
        let mut guard = self
            .rest_client
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = guard.clone() {
            return Some(client);
        }
        let client = Arc::new(RestClient::new(base_url));
        *guard = Some(Arc::clone(&client));
        Some(client)
    }

    pub fn auth(&self) -> Arc<dyn AuthBackend> {
        // Always mock, regardless of mode.
        self.auth.get_or_init(|| Arc::new(MockAuthBackend::seeded()))
    }

    pub fn customers(&self) -> Arc<dyn CustomerService> {
        self.customers
            .get_or_init(|| match self.effective_mode(ServiceName::Customer) {
                BackendMode::Real => match self.rest() {
                    Some(client) => Arc::new(RestCustomerService::new(client)),
                    None => Arc::new(MockCustomerService::seeded()),
                },
                BackendMode::Supabase => match self.pool() {
                    Some(pool) => Arc::new(SupabaseCustomerService::new(pool)),
                    None => Arc::new(MockCustomerService::seeded()),
                },
                BackendMode::Mock => Arc::new(MockCustomerService::seeded()),
            })
    }

    pub fn sales(&self) -> Arc<dyn SalesService> {
        self.sales
            .get_or_init(|| match self.effective_mode(ServiceName::Sales) {
                BackendMode::Real => match self.rest() {
                    Some(client) => Arc::new(RestSalesService::new(client)),
                    None => Arc::new(MockSalesService::seeded()),
                },
                BackendMode::Supabase => match self.pool() {
                    Some(pool) => Arc::new(SupabaseSalesService::new(pool)),
                    None => Arc::new(MockSalesService::seeded()),
                },
                BackendMode::Mock => Arc::new(MockSalesService::seeded()),
            })
    }

    pub fn tickets(&self) -> Arc<dyn TicketService> {
        self.tickets
            .get_or_init(|| match self.effective_mode(ServiceName::Ticket) {
                BackendMode::Real => match self.rest() {
                    Some(client) => Arc::new(RestTicketService::new(client)),
                    None => Arc::new(MockTicketService::seeded()),
                },
                BackendMode::Supabase => match self.pool() {
                    Some(pool) => Arc::new(SupabaseTicketService::new(pool)),
                    None => Arc::new(MockTicketService::seeded()),
                },
                BackendMode::Mock => Arc::new(MockTicketService::seeded()),
            })
    }

    pub fn contracts(&self) -> Arc<dyn ContractService> {
        self.contracts
            .get_or_init(|| match self.effective_mode(ServiceName::Contract) {
                BackendMode::Real => match self.rest() {
                    Some(client) => Arc::new(RestContractService::new(client)),
                    None => Arc::new(MockContractService::seeded()),
                },
                BackendMode::Supabase => match self.pool() {
                    Some(pool) => Arc::new(SupabaseContractService::new(pool)),
                    None => Arc::new(MockContractService::seeded()),
                },
                BackendMode::Mock => Arc::new(MockContractService::seeded()),
            })
    }

    pub fn users(&self) -> Arc<dyn UserService> {
        self.users
            .get_or_init(|| match self.effective_mode(ServiceName::User) {
                BackendMode::Real => match self.rest() {
                    Some(client) => Arc::new(RestUserService::new(client)),
                    None => Arc::new(MockUserService::seeded()),
                },
                BackendMode::Supabase => match self.pool() {
                    Some(pool) => Arc::new(SupabaseUserService::new(pool)),
                    None => Arc::new(MockUserService::seeded()),
                },
                BackendMode::Mock => Arc::new(MockUserService::seeded()),
            })
    }

    pub fn dashboard(&self) -> Arc<dyn DashboardService> {
        // No REST implementation exists for this one yet.
        self.dashboard
            .get_or_init(|| match self.effective_mode(ServiceName::Dashboard) {
                BackendMode::Supabase => match self.pool() {
                    Some(pool) => Arc::new(SupabaseDashboardService::new(pool)),
                    None => Arc::new(MockDashboardService::seeded()),
                },
                BackendMode::Real | BackendMode::Mock => Arc::new(MockDashboardService::seeded()),
            })
    }

    pub fn notifications(&self) -> Arc<dyn NotificationService> {
        // No REST implementation exists for this one yet.
        self.notifications
            .get_or_init(|| match self.effective_mode(ServiceName::Notification) {
                BackendMode::Supabase => match self.pool() {
                    Some(pool) => Arc::new(SupabaseNotificationService::new(pool)),
                    None => Arc::new(MockNotificationService::seeded()),
                },
                BackendMode::Real | BackendMode::Mock => {
                    Arc::new(MockNotificationService::seeded())
                }
            })
    }

    pub fn files(&self) -> Arc<dyn FileService> {
        // Always mock, regardless of mode.
        self.files.get_or_init(|| Arc::new(MockFileService::seeded()))
    }

    pub fn audit(&self) -> Arc<dyn AuditService> {
        // Always mock, regardless of mode.
        self.audit.get_or_init(|| Arc::new(MockAuditService::seeded()))
    }

    /// What each service would resolve to under the current configuration,
    /// without touching the caches.
    pub fn describe(&self) -> Vec<ServiceBackendStatus> {
        let config = self.current_config();
        ServiceName::ALL
            .iter()
            .map(|&name| {
                let mode = config.effective_mode(name);
                let backend = if name.is_mock_only() {
                    BackendMode::Mock
                } else {
                    match mode {
                        BackendMode::Real
                            if matches!(
                                name,
                                ServiceName::Dashboard | ServiceName::Notification
                            ) =>
                        {
                            BackendMode::Mock
                        }
                        BackendMode::Real if config.real_api_base_url.is_none() => {
                            BackendMode::Mock
                        }
                        BackendMode::Supabase if config.supabase_db_url.is_none() => {
                            BackendMode::Mock
                        }
                        other => other,
                    }
                };
                ServiceBackendStatus {
                    service: name.as_str(),
                    mode: mode.as_str(),
                    backend: backend.as_str(),
                }
            })
            .collect()
    }
}

/// Re-read the environment on an interval and invalidate the registry when
/// the configuration snapshot differs from the one it holds.
pub fn spawn_config_watcher(
    registry: Arc<ServiceRegistry>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so startup is not a
        // spurious "change".
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if registry.refresh_from(BackendConfig::from_env()) {
                tracing::info!("backend configuration changed, caches invalidated");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_registry() -> ServiceRegistry {
        ServiceRegistry::new(BackendConfig::default())
    }

    #[test]
    fn resolution_is_cached_per_epoch() {
        let registry = mock_registry();
        let first = registry.customers();
        let second = registry.customers();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn set_mode_invalidates_caches() {
        let registry = mock_registry();
        let before = registry.customers();
        registry.set_mode(BackendMode::Mock);
        let after = registry.customers();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn services_cache_independently() {
        let registry = mock_registry();
        let customers = registry.customers();
        let tickets_before = registry.tickets();
        let tickets_after = registry.tickets();
        assert!(Arc::ptr_eq(&tickets_before, &tickets_after));
        // Distinct slots hold distinct objects.
        drop(customers);
    }

    #[test]
    fn real_mode_without_base_url_degrades_to_mock() {
        let registry =
            ServiceRegistry::new(BackendConfig::default().with_global_mode(BackendMode::Real));
        let statuses = registry.describe();
        let customer = statuses
            .iter()
            .find(|s| s.service == "customer")
            .expect("customer status");
        assert_eq!(customer.mode, "real");
        assert_eq!(customer.backend, "mock");
    }

    #[test]
    fn supabase_mode_without_db_url_degrades_to_mock() {
        let registry = ServiceRegistry::new(
            BackendConfig::default().with_global_mode(BackendMode::Supabase),
        );
        let statuses = registry.describe();
        assert!(statuses
            .iter()
            .filter(|s| s.service == "customer" || s.service == "ticket")
            .all(|s| s.backend == "mock"));
    }

    #[test]
    fn mock_only_services_ignore_mode() {
        let config = BackendConfig {
            global_mode: BackendMode::Supabase,
            supabase_db_url: Some("postgres://localhost/crm".into()),
            ..Default::default()
        };
        let registry = ServiceRegistry::new(config);
        for status in registry.describe() {
            if matches!(status.service, "auth" | "file" | "audit") {
                assert_eq!(status.backend, "mock");
            }
        }
    }

    #[test]
    fn override_survives_and_beats_global() {
        let registry = mock_registry();
        registry.set_override(ServiceName::Customer, BackendMode::Real);
        assert_eq!(
            registry.effective_mode(ServiceName::Customer),
            BackendMode::Real
        );
        assert_eq!(registry.effective_mode(ServiceName::Sales), BackendMode::Mock);

        registry.clear_override(ServiceName::Customer);
        assert_eq!(
            registry.effective_mode(ServiceName::Customer),
            BackendMode::Mock
        );
    }

    #[test]
    fn refresh_is_a_no_op_when_config_unchanged() {
        let registry = mock_registry();
        let before = registry.customers();
        assert!(!registry.refresh_from(BackendConfig::default()));
        let after = registry.customers();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn refresh_with_new_config_invalidates() {
        let registry = mock_registry();
        let before = registry.customers();
        let changed = BackendConfig::default().with_global_mode(BackendMode::Supabase);
        assert!(registry.refresh_from(changed));
        let after = registry.customers();
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
