use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::events::Loggable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Prospect,
    Active,
    Churned,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loggable for Customer {
    fn entity_type() -> &'static str { "customer" }
    fn subject_id(&self) -> Uuid { self.id }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
pub struct CustomerFilters {
    /// Substring match against name and email
    pub search: Option<String>,
    pub industry: Option<String>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerCreateRequest {
    #[schema(example = "Acme Corp")]
    pub name: String,
    #[schema(example = "contact@acme.example")]
    pub email: String,
    pub phone: Option<String>,
    #[schema(example = "manufacturing")]
    pub industry: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub industry: Option<String>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

/// CSV export of the customer list. Deserialize is load-bearing: the REST
/// backend reads this shape back off the wire.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerExport {
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    pub csv: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_parses_from_wire_json() {
        let export: CustomerExport = serde_json::from_str(
            r#"{
                "generated_at": "2026-08-29T12:00:00Z",
                "count": 2,
                "csv": "id,name,email\n"
            }"#,
        )
        .unwrap();
        assert_eq!(export.count, 2);
        assert!(export.csv.starts_with("id,name,email"));
    }
}
