use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::ticket::{
    Ticket, TicketCreateRequest, TicketPriority, TicketStatus, TicketUpdateRequest,
};
use crate::services::TicketService;
use crate::utils::utc_now;

pub struct SupabaseTicketService {
    pool: PgPool,
}

impl SupabaseTicketService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbTicket {
    id: Uuid,
    tenant_id: Uuid,
    customer_id: Uuid,
    subject: String,
    description: Option<String>,
    priority: String,
    status: String,
    assignee_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_priority(value: &str) -> TicketPriority {
    match value {
        "low" => TicketPriority::Low,
        "high" => TicketPriority::High,
        "urgent" => TicketPriority::Urgent,
        _ => TicketPriority::Medium,
    }
}

fn priority_str(priority: TicketPriority) -> &'static str {
    match priority {
        TicketPriority::Low => "low",
        TicketPriority::Medium => "medium",
        TicketPriority::High => "high",
        TicketPriority::Urgent => "urgent",
    }
}

fn parse_status(value: &str) -> TicketStatus {
    match value {
        "in_progress" => TicketStatus::InProgress,
        "resolved" => TicketStatus::Resolved,
        "closed" => TicketStatus::Closed,
        _ => TicketStatus::Open,
    }
}

fn status_str(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Open => "open",
        TicketStatus::InProgress => "in_progress",
        TicketStatus::Resolved => "resolved",
        TicketStatus::Closed => "closed",
    }
}

impl From<DbTicket> for Ticket {
    fn from(db: DbTicket) -> Self {
        Ticket {
            id: db.id,
            tenant_id: db.tenant_id,
            customer_id: db.customer_id,
            subject: db.subject,
            description: db.description,
            priority: parse_priority(&db.priority),
            status: parse_status(&db.status),
            assignee_id: db.assignee_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, tenant_id, customer_id, subject, description, priority, status, assignee_id, created_at, updated_at";

#[async_trait]
impl TicketService for SupabaseTicketService {
    async fn get_tickets(&self) -> AppResult<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, DbTicket>(&format!(
            "SELECT {SELECT_COLUMNS} FROM tickets ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Ticket::from).collect())
    }

    async fn get_ticket(&self, id: Uuid) -> AppResult<Ticket> {
        let row = sqlx::query_as::<_, DbTicket>(&format!(
            "SELECT {SELECT_COLUMNS} FROM tickets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("ticket not found"))?;
        Ok(row.into())
    }

    async fn create_ticket(&self, data: TicketCreateRequest, tenant_id: Uuid) -> AppResult<Ticket> {
        let id = Uuid::new_v4();
        let now = utc_now();

        sqlx::query(
            r#"
            INSERT INTO tickets (id, tenant_id, customer_id, subject, description, priority, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .bind(data.customer_id)
        .bind(&data.subject)
        .bind(&data.description)
        .bind(priority_str(data.priority))
        .bind(status_str(TicketStatus::Open))
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Ticket {
            id,
            tenant_id,
            customer_id: data.customer_id,
            subject: data.subject,
            description: data.description,
            priority: data.priority,
            status: TicketStatus::Open,
            assignee_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_ticket(&self, id: Uuid, data: TicketUpdateRequest) -> AppResult<Ticket> {
        let row = sqlx::query_as::<_, DbTicket>(&format!(
            r#"
            UPDATE tickets SET
                subject = COALESCE($2, subject),
                description = COALESCE($3, description),
                priority = COALESCE($4, priority),
                status = COALESCE($5, status),
                updated_at = $6
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.subject)
        .bind(data.description)
        .bind(data.priority.map(priority_str))
        .bind(data.status.map(status_str))
        .bind(utc_now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("ticket not found"))?;
        Ok(row.into())
    }

    async fn delete_ticket(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("ticket not found"));
        }
        Ok(())
    }

    async fn assign_ticket(&self, id: Uuid, assignee_id: Uuid) -> AppResult<Ticket> {
        let row = sqlx::query_as::<_, DbTicket>(&format!(
            r#"
            UPDATE tickets SET
                assignee_id = $2,
                status = CASE WHEN status = 'open' THEN 'in_progress' ELSE status END,
                updated_at = $3
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(assignee_id)
        .bind(utc_now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("ticket not found"))?;
        Ok(row.into())
    }
}
