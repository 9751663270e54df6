use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{enforce, permissions};
use crate::errors::{AppError, AppResult};
use crate::events::log_activity;
use crate::jwt::AuthUser;
use crate::models::ticket::{
    AssignTicketRequest, Ticket, TicketCreateRequest, TicketUpdateRequest,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tickets).post(create_ticket))
        .route("/:id", get(get_ticket).put(update_ticket).delete(delete_ticket))
        .route("/:id/assign", post(assign_ticket))
}

fn require_tenant(auth: &AuthUser) -> AppResult<Uuid> {
    auth.principal
        .tenant_id
        .ok_or_else(|| AppError::bad_request("principal has no tenant"))
}

#[utoipa::path(
    get,
    path = "/tickets",
    tag = "Tickets",
    responses((status = 200, description = "Ticket list", body = Vec<Ticket>)),
    security(("bearerAuth" = []))
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<Ticket>>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), permissions::READ)?;
    let tickets = state.registry.tickets().get_tickets().await?;
    Ok(Json(tickets))
}

#[utoipa::path(
    get,
    path = "/tickets/{id}",
    tag = "Tickets",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket detail", body = Ticket),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Ticket>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), permissions::READ)?;
    let ticket = state.registry.tickets().get_ticket(id).await?;
    Ok(Json(ticket))
}

#[utoipa::path(
    post,
    path = "/tickets",
    tag = "Tickets",
    request_body = TicketCreateRequest,
    responses((status = 201, description = "Ticket created", body = Ticket)),
    security(("bearerAuth" = []))
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TicketCreateRequest>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), "tickets:create")?;
    let tenant_id = require_tenant(&auth)?;

    let ticket = state.registry.tickets().create_ticket(payload, tenant_id).await?;

    log_activity(&state.event_bus, "created", Some(auth.principal.id), &ticket);

    Ok((StatusCode::CREATED, Json(ticket)))
}

#[utoipa::path(
    put,
    path = "/tickets/{id}",
    tag = "Tickets",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    request_body = TicketUpdateRequest,
    responses(
        (status = 200, description = "Ticket updated", body = Ticket),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TicketUpdateRequest>,
) -> AppResult<Json<Ticket>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), "tickets:update")?;

    let ticket = state.registry.tickets().update_ticket(id, payload).await?;

    log_activity(&state.event_bus, "updated", Some(auth.principal.id), &ticket);

    Ok(Json(ticket))
}

#[utoipa::path(
    delete,
    path = "/tickets/{id}",
    tag = "Tickets",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 204, description = "Ticket deleted"),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), "tickets:delete")?;

    let service = state.registry.tickets();
    let ticket = service.get_ticket(id).await?;
    service.delete_ticket(id).await?;

    log_activity(&state.event_bus, "deleted", Some(auth.principal.id), &ticket);

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/tickets/{id}/assign",
    tag = "Tickets",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    request_body = AssignTicketRequest,
    responses(
        (status = 200, description = "Ticket assigned", body = Ticket),
        (status = 404, description = "Ticket not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn assign_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignTicketRequest>,
) -> AppResult<Json<Ticket>> {
    enforce(&state.authz, state.authz_mode, Some(&auth.principal), "tickets:assign")?;

    let ticket = state
        .registry
        .tickets()
        .assign_ticket(id, payload.assignee_id)
        .await?;

    log_activity(&state.event_bus, "assigned", Some(auth.principal.id), &ticket);

    Ok(Json(ticket))
}
