use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::events::Loggable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductSale {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub product_name: String,
    pub amount: f64,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loggable for ProductSale {
    fn entity_type() -> &'static str { "product_sale" }
    fn subject_id(&self) -> Uuid { self.id }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleCreateRequest {
    pub customer_id: Uuid,
    #[schema(example = "Enterprise License")]
    pub product_name: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleUpdateRequest {
    pub product_name: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleStatusRequest {
    pub status: SaleStatus,
}
