use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::ticket::{
    Ticket, TicketCreateRequest, TicketPriority, TicketStatus, TicketUpdateRequest,
};
use crate::services::TicketService;
use crate::utils::utc_now;

use super::{demo_customer_id, demo_tenant_id};

pub struct MockTicketService {
    tickets: RwLock<Vec<Ticket>>,
}

impl MockTicketService {
    pub fn seeded() -> Self {
        let now = utc_now();
        let tickets = vec![
            Ticket {
                id: Uuid::from_u128(0x5000_0000_0000_0000_0000_0000_0000_0001),
                tenant_id: demo_tenant_id(),
                customer_id: demo_customer_id(),
                subject: "Cannot log in".into(),
                description: Some("Password reset loop".into()),
                priority: TicketPriority::High,
                status: TicketStatus::Open,
                assignee_id: None,
                created_at: now,
                updated_at: now,
            },
            Ticket {
                id: Uuid::from_u128(0x5000_0000_0000_0000_0000_0000_0000_0002),
                tenant_id: demo_tenant_id(),
                customer_id: demo_customer_id(),
                subject: "Invoice discrepancy".into(),
                description: None,
                priority: TicketPriority::Medium,
                status: TicketStatus::Resolved,
                assignee_id: None,
                created_at: now,
                updated_at: now,
            },
        ];
        Self {
            tickets: RwLock::new(tickets),
        }
    }
}

#[async_trait]
impl TicketService for MockTicketService {
    async fn get_tickets(&self) -> AppResult<Vec<Ticket>> {
        Ok(self.tickets.read().await.clone())
    }

    async fn get_ticket(&self, id: Uuid) -> AppResult<Ticket> {
        self.tickets
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("ticket not found"))
    }

    async fn create_ticket(&self, data: TicketCreateRequest, tenant_id: Uuid) -> AppResult<Ticket> {
        let now = utc_now();
        let ticket = Ticket {
            id: Uuid::new_v4(),
            tenant_id,
            customer_id: data.customer_id,
            subject: data.subject,
            description: data.description,
            priority: data.priority,
            status: TicketStatus::Open,
            assignee_id: None,
            created_at: now,
            updated_at: now,
        };
        self.tickets.write().await.push(ticket.clone());
        Ok(ticket)
    }

    async fn update_ticket(&self, id: Uuid, data: TicketUpdateRequest) -> AppResult<Ticket> {
        let mut guard = self.tickets.write().await;
        let ticket = guard
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("ticket not found"))?;

        if let Some(subject) = data.subject {
            ticket.subject = subject;
        }
        if let Some(description) = data.description {
            ticket.description = Some(description);
        }
        if let Some(priority) = data.priority {
            ticket.priority = priority;
        }
        if let Some(status) = data.status {
            ticket.status = status;
        }
        ticket.updated_at = utc_now();
        Ok(ticket.clone())
    }

    async fn delete_ticket(&self, id: Uuid) -> AppResult<()> {
        let mut guard = self.tickets.write().await;
        let before = guard.len();
        guard.retain(|t| t.id != id);
        if guard.len() == before {
            return Err(AppError::not_found("ticket not found"));
        }
        Ok(())
    }

    async fn assign_ticket(&self, id: Uuid, assignee_id: Uuid) -> AppResult<Ticket> {
        let mut guard = self.tickets.write().await;
        let ticket = guard
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("ticket not found"))?;
        ticket.assignee_id = Some(assignee_id);
        if ticket.status == TicketStatus::Open {
            ticket.status = TicketStatus::InProgress;
        }
        ticket.updated_at = utc_now();
        Ok(ticket.clone())
    }
}
