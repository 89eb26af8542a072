//! 超级管理员播种
//! Superuser seeding
//!
//! 服务启动时根据配置创建初始超级管理员，已存在时不做任何修改。
//! Creates the initial superuser from configuration at startup; an
//! existing record is left untouched.

use crate::comm::config_validator::AppConfiguration;
use crate::error::AppResult;
use crate::modules::user::service::{self, NewAccount};
use crate::modules::user::store::UserStore;

/// 确保配置的超级管理员存在
/// Ensure the configured superuser exists
pub async fn ensure_superuser(store: &dyn UserStore, config: &AppConfiguration) -> AppResult<()> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        // 未配置播种账户
        return Ok(());
    };

    let normalized = service::normalize_email(email);
    if store.find_by_email(&normalized).await?.is_some() {
        tracing::info!(email = %normalized, "超级管理员已存在，跳过播种 / superuser already present");
        return Ok(());
    }

    let name = config
        .admin_name
        .clone()
        .unwrap_or_else(|| "Administrator".to_string());

    let user = service::create_user(
        store,
        NewAccount {
            email: email.clone(),
            password: password.clone(),
            name,
            is_staff: true,
            is_superuser: true,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "✅ 超级管理员播种完成 / superuser seeded");
    Ok(())
}
