use std::collections::HashMap;
use std::time::Duration;

/// Which concrete backend serves a logical service.
///
/// Unrecognized values always degrade to `Mock`; a misconfigured deployment
/// keeps running against the in-memory backend instead of failing to boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendMode {
    #[default]
    Mock,
    Real,
    Supabase,
}

impl BackendMode {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "real" => BackendMode::Real,
            "supabase" => BackendMode::Supabase,
            _ => BackendMode::Mock,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Mock => "mock",
            BackendMode::Real => "real",
            BackendMode::Supabase => "supabase",
        }
    }
}

/// The closed set of logical service names the registry can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceName {
    Auth,
    Customer,
    Sales,
    Ticket,
    Contract,
    User,
    Dashboard,
    Notification,
    File,
    Audit,
}

impl ServiceName {
    pub const ALL: [ServiceName; 10] = [
        ServiceName::Auth,
        ServiceName::Customer,
        ServiceName::Sales,
        ServiceName::Ticket,
        ServiceName::Contract,
        ServiceName::User,
        ServiceName::Dashboard,
        ServiceName::Notification,
        ServiceName::File,
        ServiceName::Audit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Auth => "auth",
            ServiceName::Customer => "customer",
            ServiceName::Sales => "sales",
            ServiceName::Ticket => "ticket",
            ServiceName::Contract => "contract",
            ServiceName::User => "user",
            ServiceName::Dashboard => "dashboard",
            ServiceName::Notification => "notification",
            ServiceName::File => "file",
            ServiceName::Audit => "audit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == value.trim().to_lowercase())
    }

    /// Env var suffix for per-service overrides, e.g. `BACKEND_MODE_CUSTOMER`.
    fn env_suffix(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Services that only ever have a mock implementation, regardless of the
    /// configured mode.
    pub fn is_mock_only(&self) -> bool {
        matches!(
            self,
            ServiceName::Auth | ServiceName::File | ServiceName::Audit
        )
    }
}

/// Snapshot of the backend selection configuration.
///
/// Read from the environment at startup and re-read by the registry's poll
/// watcher; the registry treats any change as a full cache invalidation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendConfig {
    pub global_mode: BackendMode,
    pub overrides: HashMap<ServiceName, BackendMode>,
    pub supabase_db_url: Option<String>,
    pub real_api_base_url: Option<String>,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parameterized over the variable source so tests don't have to mutate
    /// process-global environment state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Legacy flag predates BACKEND_MODE; when set truthy it forces mock
        // regardless of what BACKEND_MODE says.
        let legacy_mock = lookup("USE_MOCK_API")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let global_mode = if legacy_mock {
            BackendMode::Mock
        } else {
            lookup("BACKEND_MODE")
                .map(|v| BackendMode::parse(&v))
                .unwrap_or_default()
        };

        let mut overrides = HashMap::new();
        for name in ServiceName::ALL {
            if let Some(raw) = lookup(&format!("BACKEND_MODE_{}", name.env_suffix())) {
                overrides.insert(name, BackendMode::parse(&raw));
            }
        }

        Self {
            global_mode,
            overrides,
            supabase_db_url: lookup("SUPABASE_DB_URL"),
            real_api_base_url: lookup("REAL_API_BASE_URL"),
        }
    }

    /// Per-service override wins over the global default.
    pub fn effective_mode(&self, name: ServiceName) -> BackendMode {
        self.overrides
            .get(&name)
            .copied()
            .unwrap_or(self.global_mode)
    }

    pub fn with_global_mode(mut self, mode: BackendMode) -> Self {
        self.global_mode = mode;
        self
    }

    pub fn with_override(mut self, name: ServiceName, mode: BackendMode) -> Self {
        self.overrides.insert(name, mode);
        self
    }
}

/// Interval for the registry's configuration poll.
pub fn poll_interval() -> Duration {
    let secs = std::env::var("CONFIG_POLL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(30);
    Duration::from_secs(secs.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_to_mock_when_nothing_set() {
        let config = BackendConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.global_mode, BackendMode::Mock);
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn parses_global_mode() {
        let config = BackendConfig::from_lookup(lookup_from(&[("BACKEND_MODE", "supabase")]));
        assert_eq!(config.global_mode, BackendMode::Supabase);
    }

    #[test]
    fn unknown_mode_degrades_to_mock() {
        let config = BackendConfig::from_lookup(lookup_from(&[("BACKEND_MODE", "banana")]));
        assert_eq!(config.global_mode, BackendMode::Mock);
    }

    #[test]
    fn legacy_flag_forces_mock() {
        let config = BackendConfig::from_lookup(lookup_from(&[
            ("USE_MOCK_API", "true"),
            ("BACKEND_MODE", "real"),
        ]));
        assert_eq!(config.global_mode, BackendMode::Mock);
    }

    #[test]
    fn per_service_override_beats_global() {
        let config = BackendConfig::from_lookup(lookup_from(&[
            ("BACKEND_MODE", "mock"),
            ("BACKEND_MODE_CUSTOMER", "supabase"),
        ]));
        assert_eq!(
            config.effective_mode(ServiceName::Customer),
            BackendMode::Supabase
        );
        assert_eq!(config.effective_mode(ServiceName::Sales), BackendMode::Mock);
    }

    #[test]
    fn service_name_round_trips() {
        for name in ServiceName::ALL {
            assert_eq!(ServiceName::parse(name.as_str()), Some(name));
        }
        assert_eq!(ServiceName::parse("warehouse"), None);
    }
}
