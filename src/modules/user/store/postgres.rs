//! PostgreSQL 账户存储
//! PostgreSQL account store
//!
//! 期望的表结构（迁移由部署侧负责）：
//! Expected table, migrations are owned by the deployment side:
//!
//! ```sql
//! CREATE TABLE users (
//!     id            BIGSERIAL PRIMARY KEY,
//!     email         TEXT NOT NULL UNIQUE,
//!     name          TEXT NOT NULL,
//!     password_hash TEXT NOT NULL,
//!     is_active     BOOLEAN NOT NULL DEFAULT TRUE,
//!     is_staff      BOOLEAN NOT NULL DEFAULT FALSE,
//!     is_superuser  BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at    TIMESTAMP NOT NULL DEFAULT NOW(),
//!     updated_at    TIMESTAMP NOT NULL DEFAULT NOW()
//! );
//! ```

use super::{StoreError, UserStore};
use crate::error::{AppError, AppResult};
use crate::modules::user::models::{NewUser, User, UserChanges};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// 建立连接池
    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(Self { pool })
    }

    #[allow(dead_code)]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    // 唯一约束冲突映射为邮箱重复
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Database(e.to_string())
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash, is_active, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(new_user.is_active)
        .bind(new_user.is_staff)
        .bind(new_user.is_superuser)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, StoreError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name          = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                is_active     = COALESCE($4, is_active),
                is_staff      = COALESCE($5, is_staff),
                is_superuser  = COALESCE($6, is_superuser),
                updated_at    = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.password_hash)
        .bind(changes.is_active)
        .bind(changes.is_staff)
        .bind(changes.is_superuser)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        updated.ok_or(StoreError::NotFound)
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<User>, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE $1::TEXT IS NULL
               OR name  ILIKE '%' || $1 || '%'
               OR email ILIKE '%' || $1 || '%'
            ORDER BY id ASC
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}
