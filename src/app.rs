use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::authz::{AuthzEngine, AuthzMode};
use crate::errors::AppError;
use crate::events::EventBus;
use crate::jwt::JwtConfig;
use crate::registry::ServiceRegistry;
use crate::routes::{admin, auth, customers, health, tickets};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub sessions: SessionStore,
    pub authz: Arc<AuthzEngine>,
    pub authz_mode: AuthzMode,
    pub jwt: Arc<JwtConfig>,
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(registry: Arc<ServiceRegistry>, jwt: JwtConfig, event_bus: EventBus) -> Self {
        Self {
            registry,
            sessions: SessionStore::new(),
            authz: Arc::new(AuthzEngine::new()),
            authz_mode: AuthzMode::from_env(),
            jwt: Arc::new(jwt),
            event_bus,
        }
    }
}

pub fn create_app(registry: Arc<ServiceRegistry>, event_bus: EventBus) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let state = AppState::new(registry, jwt_config, event_bus);
    Ok(create_app_with_state(state))
}

pub fn create_app_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/auth", auth::routes())
        .nest("/customers", customers::routes())
        .nest("/tickets", tickets::routes())
        .nest("/admin", admin::routes())
        .merge(health::routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
