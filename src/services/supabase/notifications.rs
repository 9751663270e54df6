use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::notification::Notification;
use crate::services::NotificationService;

pub struct SupabaseNotificationService {
    pool: PgPool,
}

impl SupabaseNotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DbNotification {
    id: Uuid,
    user_id: Uuid,
    title: String,
    body: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl From<DbNotification> for Notification {
    fn from(db: DbNotification) -> Self {
        Notification {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            body: db.body,
            read: db.read,
            created_at: db.created_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, user_id, title, body, read, created_at";

#[async_trait]
impl NotificationService for SupabaseNotificationService {
    async fn get_notifications(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, DbNotification>(&format!(
            "SELECT {SELECT_COLUMNS} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<Notification> {
        let row = sqlx::query_as::<_, DbNotification>(&format!(
            "UPDATE notifications SET read = true WHERE id = $1 RETURNING {SELECT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("notification not found"))?;
        Ok(row.into())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = true WHERE user_id = $1 AND read = false",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_notification(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("notification not found"));
        }
        Ok(())
    }
}
