//! 账户存储层
//! Account store layer
//!
//! `UserStore` 是持久化的接缝：默认内存实现（memory feature），
//! postgres feature 下提供 sqlx 实现。邮箱唯一性约束在这一层强制执行。
//! `UserStore` is the persistence seam: in-memory by default (memory
//! feature), sqlx-backed under the postgres feature. Email uniqueness is
//! enforced at this layer.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use crate::comm::config_validator::AppConfiguration;
use crate::error::{AppError, AppResult};
use crate::modules::user::models::{NewUser, User, UserChanges};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// 存储层错误
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("该邮箱已被注册 / email already registered")]
    DuplicateEmail,

    #[error("用户不存在 / user not found")]
    NotFound,

    #[error("数据库错误: {0}")]
    Database(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AppError::validation("email", e.to_string()),
            StoreError::NotFound => AppError::not_found("user"),
            StoreError::Database(message) => AppError::database(message),
        }
    }
}

/// 账户存储接口
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 插入新用户，邮箱重复时返回 `StoreError::DuplicateEmail`
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// 按 id 查找
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// 按规范化后的邮箱查找
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// 部分更新，目标不存在时返回 `StoreError::NotFound`
    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, StoreError>;

    /// 按 id 升序列出用户，可选在姓名/邮箱上做大小写不敏感的子串过滤
    async fn list(&self, search: Option<&str>) -> Result<Vec<User>, StoreError>;
}

/// 共享的存储句柄，注入到 actix 应用状态
/// Shared store handle injected into actix app state
pub type SharedUserStore = Arc<dyn UserStore>;

/// 初始化账户存储
/// Initialize the account store
///
/// 配置了数据库且启用 postgres feature 时使用 PostgreSQL，
/// 否则回退到内存存储。
/// PostgreSQL when a database is configured and the postgres feature is
/// enabled, in-memory otherwise.
pub async fn init_user_store(app_config: &AppConfiguration) -> AppResult<SharedUserStore> {
    if let Some(_url) = &app_config.database_url {
        #[cfg(feature = "postgres")]
        {
            let max_connections = app_config.database_max_connections.unwrap_or(10);
            let store = postgres::PgUserStore::connect(_url, max_connections).await?;
            tracing::info!("使用 PostgreSQL 账户存储 / using PostgreSQL account store");
            return Ok(Arc::new(store));
        }

        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!("postgres 功能未启用，回退到内存存储");
            tracing::warn!("postgres feature not enabled, falling back to memory store");
        }
    }

    tracing::info!("使用内存账户存储 / using in-memory account store");
    Ok(Arc::new(memory::MemoryUserStore::new()))
}
