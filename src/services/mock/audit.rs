use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::audit::{AuditEntry, AuditRecord};
use crate::services::AuditService;
use crate::utils::utc_now;

/// Append-only audit store with a SHA-256 hash chain: each entry's hash
/// covers the previous entry's hash plus its own identifying fields, so any
/// in-place edit or deletion breaks verification from that point on.
pub struct MockAuditService {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MockAuditService {
    pub fn seeded() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

fn chain_hash(
    prev_hash: Option<&str>,
    event_name: &str,
    occurred_at: DateTime<Utc>,
    payload: &Value,
) -> String {
    let mut hasher = Sha256::new();
    if let Some(prev) = prev_hash {
        hasher.update(prev.as_bytes());
    }
    hasher.update(event_name.as_bytes());
    hasher.update(occurred_at.to_rfc3339().as_bytes());
    hasher.update(payload.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl AuditService for MockAuditService {
    async fn record(&self, record: AuditRecord) -> AppResult<AuditEntry> {
        let mut guard = self.entries.write().await;
        let prev_hash = guard.last().map(|e| e.hash.clone());
        let occurred_at = utc_now();
        let hash = chain_hash(
            prev_hash.as_deref(),
            &record.event_name,
            occurred_at,
            &record.payload,
        );

        let entry = AuditEntry {
            id: Uuid::new_v4(),
            event_name: record.event_name,
            actor_id: record.actor_id,
            subject_id: record.subject_id,
            occurred_at,
            severity: record.severity,
            payload: record.payload,
            prev_hash,
            hash,
        };
        guard.push(entry.clone());
        Ok(entry)
    }

    async fn get_entries(&self, limit: usize) -> AppResult<Vec<AuditEntry>> {
        let guard = self.entries.read().await;
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }

    async fn verify_chain(&self) -> AppResult<bool> {
        let guard = self.entries.read().await;
        let mut prev_hash: Option<&str> = None;
        for entry in guard.iter() {
            if entry.prev_hash.as_deref() != prev_hash {
                return Ok(false);
            }
            let expected = chain_hash(
                prev_hash,
                &entry.event_name,
                entry.occurred_at,
                &entry.payload,
            );
            if entry.hash != expected {
                return Ok(false);
            }
            prev_hash = Some(&entry.hash);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Severity;
    use serde_json::json;

    fn record(name: &str) -> AuditRecord {
        AuditRecord {
            event_name: name.to_string(),
            actor_id: Some(Uuid::new_v4()),
            subject_id: None,
            severity: Severity::Important,
            payload: json!({"event": name}),
        }
    }

    #[tokio::test]
    async fn chain_links_entries() {
        let audit = MockAuditService::seeded();
        let first = audit.record(record("customer.created")).await.unwrap();
        let second = audit.record(record("customer.updated")).await.unwrap();

        assert!(first.prev_hash.is_none());
        assert_eq!(second.prev_hash.as_deref(), Some(first.hash.as_str()));
        assert!(audit.verify_chain().await.unwrap());
    }

    #[tokio::test]
    async fn tampering_breaks_verification() {
        let audit = MockAuditService::seeded();
        audit.record(record("contract.approved")).await.unwrap();
        audit.record(record("contract.deleted")).await.unwrap();

        {
            let mut guard = audit.entries.write().await;
            guard[0].payload = json!({"event": "rewritten"});
        }
        assert!(!audit.verify_chain().await.unwrap());
    }

    #[tokio::test]
    async fn empty_chain_verifies() {
        let audit = MockAuditService::seeded();
        assert!(audit.verify_chain().await.unwrap());
    }

    #[tokio::test]
    async fn entries_are_newest_first_and_limited() {
        let audit = MockAuditService::seeded();
        for i in 0..5 {
            audit.record(record(&format!("event.{i}"))).await.unwrap();
        }
        let entries = audit.get_entries(2).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event_name, "event.4");
    }
}
