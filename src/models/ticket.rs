use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::events::Loggable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loggable for Ticket {
    fn entity_type() -> &'static str { "ticket" }
    fn subject_id(&self) -> Uuid { self.id }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketCreateRequest {
    pub customer_id: Uuid,
    #[schema(example = "Printer on fire")]
    pub subject: String,
    pub description: Option<String>,
    pub priority: TicketPriority,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketUpdateRequest {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TicketPriority>,
    pub status: Option<TicketStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignTicketRequest {
    pub assignee_id: Uuid,
}
