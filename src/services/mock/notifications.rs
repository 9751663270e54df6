use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::notification::Notification;
use crate::services::NotificationService;
use crate::utils::utc_now;

use super::demo_admin_user_id;

pub struct MockNotificationService {
    notifications: RwLock<Vec<Notification>>,
}

impl MockNotificationService {
    pub fn seeded() -> Self {
        let now = utc_now();
        let user = demo_admin_user_id();
        let notifications = vec![
            Notification {
                id: Uuid::from_u128(0x8000_0000_0000_0000_0000_0000_0000_0001),
                user_id: user,
                title: "Contract pending approval".into(),
                body: "Expansion proposal is waiting for review.".into(),
                read: false,
                created_at: now,
            },
            Notification {
                id: Uuid::from_u128(0x8000_0000_0000_0000_0000_0000_0000_0002),
                user_id: user,
                title: "New high-priority ticket".into(),
                body: "Cannot log in (Acme Corp)".into(),
                read: true,
                created_at: now,
            },
        ];
        Self {
            notifications: RwLock::new(notifications),
        }
    }
}

#[async_trait]
impl NotificationService for MockNotificationService {
    async fn get_notifications(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<Notification> {
        let mut guard = self.notifications.write().await;
        let notification = guard
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| AppError::not_found("notification not found"))?;
        notification.read = true;
        Ok(notification.clone())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let mut guard = self.notifications.write().await;
        let mut updated = 0;
        for notification in guard.iter_mut().filter(|n| n.user_id == user_id && !n.read) {
            notification.read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_notification(&self, id: Uuid) -> AppResult<()> {
        let mut guard = self.notifications.write().await;
        let before = guard.len();
        guard.retain(|n| n.id != id);
        if guard.len() == before {
            return Err(AppError::not_found("notification not found"));
        }
        Ok(())
    }
}
