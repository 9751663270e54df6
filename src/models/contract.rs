use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::events::{Loggable, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    PendingApproval,
    Active,
    Expired,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Contract {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub title: String,
    pub value: f64,
    pub status: ContractStatus,
    pub starts_on: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loggable for Contract {
    fn entity_type() -> &'static str { "contract" }
    fn subject_id(&self) -> Uuid { self.id }
    fn severity(&self) -> Severity { Severity::Critical }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContractCreateRequest {
    pub customer_id: Uuid,
    #[schema(example = "Annual support agreement")]
    pub title: String,
    pub value: f64,
    pub starts_on: DateTime<Utc>,
    pub ends_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContractUpdateRequest {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub ends_on: Option<DateTime<Utc>>,
}
