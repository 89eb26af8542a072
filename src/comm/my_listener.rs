use async_trait::async_trait;
use sa_token_core::SaTokenListener;

/// 登录事件审计监听器
/// Login event audit listener
///
/// 账户的登录、登出和强制下线都会经过这里，统一打进结构化日志。
/// Every account login, logout and kick-out flows through here into the
/// structured log stream.
pub struct MyListener;

#[async_trait]
impl SaTokenListener for MyListener {
    async fn on_login(&self, login_id: &str, _token: &str, login_type: &str) {
        tracing::info!(
            user_id = login_id,
            login_type = login_type,
            "✅ 账户登录 / account logged in"
        );
    }

    async fn on_logout(&self, login_id: &str, _token: &str, _login_type: &str) {
        tracing::info!(user_id = login_id, "账户登出 / account logged out");
    }

    async fn on_kick_out(&self, login_id: &str, _token: &str, _login_type: &str) {
        tracing::warn!(user_id = login_id, "账户被踢下线 / account kicked out");
    }

    // 其他事件方法是可选的
    // async fn on_renew_timeout(...) {}
    // async fn on_replaced(...) {}
    // async fn on_banned(...) {}
}
