use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::events::Loggable;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredFile {
    pub id: Uuid,
    pub name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Loggable for StoredFile {
    fn entity_type() -> &'static str { "file" }
    fn subject_id(&self) -> Uuid { self.id }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileUploadRequest {
    #[schema(example = "contract.pdf")]
    pub name: String,
    #[schema(example = "application/pdf")]
    pub content_type: String,
    /// Base64-encoded payload; the mock backend only records its size.
    pub data: String,
}
