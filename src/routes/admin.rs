//! Operational surface: backend mode inspection/switching and the audit
//! trail. Mode changes invalidate caches synchronously, so the response
//! already reflects what the next resolution will build.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app::AppState;
use crate::authz::{enforce, permissions};
use crate::config::{BackendMode, ServiceName};
use crate::errors::{AppError, AppResult};
use crate::jwt::AuthUser;
use crate::models::audit::AuditEntry;
use crate::registry::ServiceBackendStatus;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/backend", get(get_backend_status).put(set_backend_mode))
        .route("/audit", get(get_audit_entries))
        .route("/audit/verify", get(verify_audit_chain))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BackendStatusResponse {
    pub global_mode: &'static str,
    pub services: Vec<ServiceBackendStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BackendModeRequest {
    /// New global mode ("mock", "real", "supabase"); unknown values fall
    /// back to mock.
    pub mode: Option<String>,
    /// Service to override instead of the global default.
    pub service: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChainVerification {
    pub intact: bool,
}

#[utoipa::path(
    get,
    path = "/admin/backend",
    tag = "Admin",
    responses((status = 200, description = "Effective backend per service", body = BackendStatusResponse)),
    security(("bearerAuth" = []))
)]
pub async fn get_backend_status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<BackendStatusResponse>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), permissions::PLATFORM_ADMIN)?;

    Ok(Json(BackendStatusResponse {
        global_mode: state.registry.current_config().global_mode.as_str(),
        services: state.registry.describe(),
    }))
}

#[utoipa::path(
    put,
    path = "/admin/backend",
    tag = "Admin",
    request_body = BackendModeRequest,
    responses(
        (status = 200, description = "Mode changed", body = BackendStatusResponse),
        (status = 400, description = "Unknown service name")
    ),
    security(("bearerAuth" = []))
)]
pub async fn set_backend_mode(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<BackendModeRequest>,
) -> AppResult<Json<BackendStatusResponse>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), permissions::PLATFORM_ADMIN)?;

    match (payload.service, payload.mode) {
        (Some(service), Some(mode)) => {
            let name = ServiceName::parse(&service)
                .ok_or_else(|| AppError::bad_request(format!("unknown service: {service}")))?;
            state.registry.set_override(name, BackendMode::parse(&mode));
        }
        (Some(service), None) => {
            let name = ServiceName::parse(&service)
                .ok_or_else(|| AppError::bad_request(format!("unknown service: {service}")))?;
            state.registry.clear_override(name);
        }
        (None, Some(mode)) => state.registry.set_mode(BackendMode::parse(&mode)),
        (None, None) => return Err(AppError::bad_request("nothing to change")),
    }

    Ok(Json(BackendStatusResponse {
        global_mode: state.registry.current_config().global_mode.as_str(),
        services: state.registry.describe(),
    }))
}

#[utoipa::path(
    get,
    path = "/admin/audit",
    tag = "Admin",
    params(("limit" = Option<usize>, Query, description = "Max entries, newest first")),
    responses((status = 200, description = "Audit trail", body = Vec<AuditEntry>)),
    security(("bearerAuth" = []))
)]
pub async fn get_audit_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), permissions::VIEW_AUDIT_LOGS)?;

    let entries = state
        .registry
        .audit()
        .get_entries(query.limit.unwrap_or(100))
        .await?;
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/admin/audit/verify",
    tag = "Admin",
    responses((status = 200, description = "Hash chain verification result", body = ChainVerification)),
    security(("bearerAuth" = []))
)]
pub async fn verify_audit_chain(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ChainVerification>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), permissions::VIEW_AUDIT_LOGS)?;

    let intact = state.registry.audit().verify_chain().await?;
    Ok(Json(ChainVerification { intact }))
}
