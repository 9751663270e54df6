use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{enforce, permissions};
use crate::errors::{AppError, AppResult};
use crate::events::log_activity;
use crate::jwt::AuthUser;
use crate::models::customer::{
    BulkDeleteRequest, Customer, CustomerCreateRequest, CustomerExport, CustomerFilters,
    CustomerUpdateRequest,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/bulk-delete", post(bulk_delete_customers))
        .route("/export", get(export_customers))
        .route("/industries", get(list_industries))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

/// Tenant scope for writes comes from the session principal; callers without
/// a tenant (platform operators) cannot create tenant-owned rows.
fn require_tenant(auth: &AuthUser) -> AppResult<Uuid> {
    auth.principal
        .tenant_id
        .ok_or_else(|| AppError::bad_request("principal has no tenant"))
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "Customers",
    params(CustomerFilters),
    responses((status = 200, description = "Filtered customer list", body = Vec<Customer>)),
    security(("bearerAuth" = []))
)]
pub async fn list_customers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filters): Query<CustomerFilters>,
) -> AppResult<Json<Vec<Customer>>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), permissions::READ)?;
    let customers = state.registry.customers().get_customers(filters).await?;
    Ok(Json(customers))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer detail", body = Customer),
        (status = 404, description = "Customer not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), permissions::READ)?;
    let customer = state.registry.customers().get_customer(id).await?;
    Ok(Json(customer))
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "Customers",
    request_body = CustomerCreateRequest,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 409, description = "Email already registered")
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CustomerCreateRequest>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), "customers:create")?;
    let tenant_id = require_tenant(&auth)?;

    let customer = state
        .registry
        .customers()
        .create_customer(payload, tenant_id)
        .await?;

    log_activity(&state.event_bus, "created", Some(auth.principal.id), &customer);

    Ok((StatusCode::CREATED, Json(customer)))
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = CustomerUpdateRequest,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 404, description = "Customer not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerUpdateRequest>,
) -> AppResult<Json<Customer>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), "customers:update")?;

    let customer = state.registry.customers().update_customer(id, payload).await?;

    log_activity(&state.event_bus, "updated", Some(auth.principal.id), &customer);

    Ok(Json(customer))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), "customers:delete")?;

    let service = state.registry.customers();
    let customer = service.get_customer(id).await?;
    service.delete_customer(id).await?;

    log_activity(&state.event_bus, "deleted", Some(auth.principal.id), &customer);

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/customers/bulk-delete",
    tag = "Customers",
    request_body = BulkDeleteRequest,
    responses((status = 200, description = "Count of deleted customers", body = BulkDeleteResponse)),
    security(("bearerAuth" = []))
)]
pub async fn bulk_delete_customers(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteResponse>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), "customers:delete")?;

    let deleted = state
        .registry
        .customers()
        .bulk_delete_customers(payload.ids)
        .await?;

    Ok(Json(BulkDeleteResponse { deleted }))
}

#[utoipa::path(
    get,
    path = "/customers/export",
    tag = "Customers",
    responses((status = 200, description = "CSV export", body = CustomerExport)),
    security(("bearerAuth" = []))
)]
pub async fn export_customers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<CustomerExport>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), permissions::READ)?;
    let export = state.registry.customers().export_customers().await?;
    Ok(Json(export))
}

#[utoipa::path(
    get,
    path = "/customers/industries",
    tag = "Customers",
    responses((status = 200, description = "Distinct industries", body = Vec<String>)),
    security(("bearerAuth" = []))
)]
pub async fn list_industries(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<String>>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), permissions::READ)?;
    let industries = state.registry.customers().get_industries().await?;
    Ok(Json(industries))
}
