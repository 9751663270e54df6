use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::authz::{Role, UserStatus};
use crate::errors::{AppError, AppResult};
use crate::models::user::{UserAccount, UserCreateRequest, UserUpdateRequest};
use crate::services::UserService;
use crate::utils::utc_now;

pub struct SupabaseUserService {
    pool: PgPool,
}

impl SupabaseUserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbUser {
    id: Uuid,
    tenant_id: Option<Uuid>,
    email: String,
    display_name: String,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role(value: &str) -> Role {
    Role::parse(value).unwrap_or(Role::Customer)
}

fn parse_user_status(value: &str) -> UserStatus {
    match value {
        "inactive" => UserStatus::Inactive,
        "suspended" => UserStatus::Suspended,
        _ => UserStatus::Active,
    }
}

fn user_status_str(status: UserStatus) -> &'static str {
    match status {
        UserStatus::Active => "active",
        UserStatus::Inactive => "inactive",
        UserStatus::Suspended => "suspended",
    }
}

impl From<DbUser> for UserAccount {
    fn from(db: DbUser) -> Self {
        UserAccount {
            id: db.id,
            tenant_id: db.tenant_id,
            email: db.email,
            display_name: db.display_name,
            role: parse_role(&db.role),
            status: parse_user_status(&db.status),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, tenant_id, email, display_name, role, status, created_at, updated_at";

#[async_trait]
impl UserService for SupabaseUserService {
    async fn get_users(&self) -> AppResult<Vec<UserAccount>> {
        let rows = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(UserAccount::from).collect())
    }

    async fn get_user(&self, id: Uuid) -> AppResult<UserAccount> {
        let row = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;
        Ok(row.into())
    }

    async fn create_user(&self, data: UserCreateRequest) -> AppResult<UserAccount> {
        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&data.email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::conflict("email already registered"));
        }

        let id = Uuid::new_v4();
        let now = utc_now();

        sqlx::query(
            r#"
            INSERT INTO users (id, tenant_id, email, display_name, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            "#,
        )
        .bind(id)
        .bind(data.tenant_id)
        .bind(&data.email)
        .bind(&data.display_name)
        .bind(data.role.as_str())
        .bind(user_status_str(UserStatus::Active))
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(UserAccount {
            id,
            tenant_id: data.tenant_id,
            email: data.email,
            display_name: data.display_name,
            role: data.role,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_user(&self, id: Uuid, data: UserUpdateRequest) -> AppResult<UserAccount> {
        let row = sqlx::query_as::<_, DbUser>(&format!(
            r#"
            UPDATE users SET
                display_name = COALESCE($2, display_name),
                role = COALESCE($3, role),
                status = COALESCE($4, status),
                updated_at = $5
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.display_name)
        .bind(data.role.map(|r| r.as_str()))
        .bind(data.status.map(user_status_str))
        .bind(utc_now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;
        Ok(row.into())
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("user not found"));
        }
        Ok(())
    }
}
