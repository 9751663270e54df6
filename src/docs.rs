//! OpenAPI document assembly and the Swagger UI mount.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::models;
use crate::routes;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::auth::login,
        routes::auth::me,
        routes::auth::logout,
        routes::customers::list_customers,
        routes::customers::get_customer,
        routes::customers::create_customer,
        routes::customers::update_customer,
        routes::customers::delete_customer,
        routes::customers::bulk_delete_customers,
        routes::customers::export_customers,
        routes::customers::list_industries,
        routes::tickets::list_tickets,
        routes::tickets::get_ticket,
        routes::tickets::create_ticket,
        routes::tickets::update_ticket,
        routes::tickets::delete_ticket,
        routes::tickets::assign_ticket,
        routes::admin::get_backend_status,
        routes::admin::set_backend_mode,
        routes::admin::get_audit_entries,
        routes::admin::verify_audit_chain,
        routes::health::health,
    ),
    components(
        schemas(
            crate::authz::Principal,
            crate::authz::Role,
            crate::authz::UserStatus,
            models::user::LoginRequest,
            models::user::AuthResponse,
            models::customer::Customer,
            models::customer::CustomerStatus,
            models::customer::CustomerCreateRequest,
            models::customer::CustomerUpdateRequest,
            models::customer::BulkDeleteRequest,
            models::customer::CustomerExport,
            models::ticket::Ticket,
            models::ticket::TicketPriority,
            models::ticket::TicketStatus,
            models::ticket::TicketCreateRequest,
            models::ticket::TicketUpdateRequest,
            models::ticket::AssignTicketRequest,
            models::audit::AuditEntry,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Session endpoints"),
        (name = "Customers", description = "Customer management"),
        (name = "Tickets", description = "Support tickets"),
        (name = "Admin", description = "Backend mode switching and audit trail"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub fn swagger_routes<S>() -> axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    axum::Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
