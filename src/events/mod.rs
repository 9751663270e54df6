use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

pub mod loggable;
pub use loggable::{Loggable, Severity};

use crate::models::audit::AuditRecord;
use crate::services::AuditService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: Uuid,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
    pub actor_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub severity: Severity,
    pub payload: Value,
}

impl DomainEvent {
    pub fn new(
        name: String,
        actor_id: Option<Uuid>,
        subject_id: Option<Uuid>,
        severity: Severity,
        payload: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            occurred_at: Utc::now(),
            actor_id,
            subject_id,
            severity,
            payload,
        }
    }
}

pub type EventBus = broadcast::Sender<DomainEvent>;

pub fn init_event_bus() -> (EventBus, broadcast::Receiver<DomainEvent>) {
    broadcast::channel(1024)
}

/// Publish an activity event for any entity implementing `Loggable`.
/// Fire and forget - logging failures must not break the API call itself.
pub fn log_activity<T: Loggable>(
    event_bus: &EventBus,
    action: &str,
    actor_id: Option<Uuid>,
    entity: &T,
) {
    let event_name = format!("{}.{}", T::entity_type(), action);
    let severity = entity.severity_for_action(action);

    let event = DomainEvent::new(
        event_name,
        actor_id,
        Some(entity.subject_id()),
        severity,
        serde_json::to_value(entity).unwrap_or_default(),
    );

    let _ = event_bus.send(event);
}

/// Forward bus events into the audit service. Spawned once by the
/// composition root; exits when every bus sender is dropped.
pub async fn start_audit_listener(
    mut rx: broadcast::Receiver<DomainEvent>,
    audit: Arc<dyn AuditService>,
) {
    tracing::info!("audit listener started");
    loop {
        match rx.recv().await {
            Ok(event) => {
                let record = AuditRecord {
                    event_name: event.name.clone(),
                    actor_id: event.actor_id,
                    subject_id: event.subject_id,
                    severity: event.severity,
                    payload: event.payload,
                };
                if let Err(err) = audit.record(record).await {
                    tracing::error!("failed to record audit entry: {}", err);
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "audit listener lagged, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    tracing::info!("audit listener stopped");
}
