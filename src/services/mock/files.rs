use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::file::StoredFile;
use crate::services::FileService;
use crate::utils::utc_now;

/// Metadata-only file store; payloads are discarded after size accounting.
pub struct MockFileService {
    files: RwLock<Vec<StoredFile>>,
}

impl MockFileService {
    pub fn seeded() -> Self {
        Self {
            files: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl FileService for MockFileService {
    async fn upload_file(
        &self,
        name: String,
        content_type: String,
        size_bytes: u64,
        uploaded_by: Uuid,
    ) -> AppResult<StoredFile> {
        let file = StoredFile {
            id: Uuid::new_v4(),
            name,
            content_type,
            size_bytes,
            uploaded_by,
            created_at: utc_now(),
        };
        self.files.write().await.push(file.clone());
        Ok(file)
    }

    async fn list_files(&self) -> AppResult<Vec<StoredFile>> {
        Ok(self.files.read().await.clone())
    }

    async fn delete_file(&self, id: Uuid) -> AppResult<()> {
        let mut guard = self.files.write().await;
        let before = guard.len();
        guard.retain(|f| f.id != id);
        if guard.len() == before {
            return Err(AppError::not_found("file not found"));
        }
        Ok(())
    }
}
