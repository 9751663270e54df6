use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::ticket::{
    AssignTicketRequest, Ticket, TicketCreateRequest, TicketUpdateRequest,
};
use crate::services::TicketService;

use super::{RestClient, TenantScoped};

pub struct RestTicketService {
    client: Arc<RestClient>,
}

impl RestTicketService {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TicketService for RestTicketService {
    async fn get_tickets(&self) -> AppResult<Vec<Ticket>> {
        self.client.get_json("/api/tickets").await
    }

    async fn get_ticket(&self, id: Uuid) -> AppResult<Ticket> {
        self.client.get_json(&format!("/api/tickets/{id}")).await
    }

    async fn create_ticket(&self, data: TicketCreateRequest, tenant_id: Uuid) -> AppResult<Ticket> {
        self.client
            .post_json(
                "/api/tickets",
                &TenantScoped {
                    tenant_id,
                    data: &data,
                },
            )
            .await
    }

    async fn update_ticket(&self, id: Uuid, data: TicketUpdateRequest) -> AppResult<Ticket> {
        self.client
            .put_json(&format!("/api/tickets/{id}"), &data)
            .await
    }

    async fn delete_ticket(&self, id: Uuid) -> AppResult<()> {
        self.client.delete(&format!("/api/tickets/{id}")).await
    }

    async fn assign_ticket(&self, id: Uuid, assignee_id: Uuid) -> AppResult<Ticket> {
        self.client
            .put_json(
                &format!("/api/tickets/{id}/assign"),
                &AssignTicketRequest { assignee_id },
            )
            .await
    }
}
