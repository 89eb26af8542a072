// Author: 金书记
//
//! 账户与凭据服务
//! Account and credential service
//!
//! 边界校验、邮箱规范化、密码哈希与 token 签发都集中在这里，
//! HTTP 层和管理端走的是同一条路径。
//! Boundary validation, email normalization, password hashing and token
//! issuance all live here; the HTTP layer and the admin surface share the
//! same code path.

use crate::error::{AppError, AppResult};
use crate::modules::user::models::{NewUser, User, UserChanges};
use crate::modules::user::password;
use crate::modules::user::store::UserStore;
use lazy_static::lazy_static;
use regex::Regex;
use sa_token_plugin_actix_web::SaTokenState;

/// 密码最小长度
pub const MIN_PASSWORD_LENGTH: usize = 5;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
}

/// 新账户的输入
/// Input for a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewAccount {
    /// 普通账户（无管理权限）
    pub fn regular(email: impl Into<String>, password: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            is_staff: false,
            is_superuser: false,
        }
    }
}

/// 账户的部分更新（密码为明文，入库前哈希）
/// Partial account update; the password is plaintext and hashed before
/// it reaches the store
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// 规范化邮箱：去除首尾空白，域名部分小写
/// Normalize an email: trim, lowercase the domain part
///
/// 本地部分保持原样，"Test@EXAMPLE.com" 规范化为 "Test@example.com"。
pub fn normalize_email(raw: &str) -> String {
    let email = raw.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// 校验邮箱格式
pub fn validate_email(email: &str) -> AppResult<()> {
    if email.trim().is_empty() {
        return Err(AppError::validation("email", "邮箱不能为空 / email must not be blank"));
    }
    if !EMAIL_REGEX.is_match(email.trim()) {
        return Err(AppError::validation(
            "email",
            "不是有效的邮箱地址 / not a valid email address",
        ));
    }
    Ok(())
}

/// 校验密码长度
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::validation(
            "password",
            "密码不能为空 / password must not be blank",
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(
            "password",
            format!(
                "密码长度至少为{}个字符 / password must be at least {} characters",
                MIN_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH
            ),
        ));
    }
    Ok(())
}

/// 创建账户
/// Create an account
///
/// 先做全部边界校验，再哈希密码、写入存储。任何一步失败都不会
/// 留下半成品记录。
/// All boundary checks run first, then hash and insert. A failure at any
/// step leaves no partial record behind.
pub async fn create_user(store: &dyn UserStore, account: NewAccount) -> AppResult<User> {
    validate_email(&account.email)?;
    validate_password(&account.password)?;

    let email = normalize_email(&account.email);
    let password_hash = password::hash_password(&account.password)?;

    let user = store
        .insert(NewUser {
            email,
            name: account.name,
            password_hash,
            is_active: true,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
        })
        .await?;

    tracing::info!(user_id = user.id, email = %user.email, "账户创建成功 / account created");
    Ok(user)
}

/// 校验邮箱/密码并返回对应用户
/// Verify an email/password pair and return the matching user
///
/// 未注册邮箱、密码不匹配和停用账户都返回同一个凭据错误，
/// 不暴露具体是哪个字段出了问题。
/// Unknown email, wrong password and deactivated accounts all map to the
/// same credentials error; nothing reveals which input failed.
pub async fn authenticate(store: &dyn UserStore, email: &str, raw_password: &str) -> AppResult<User> {
    if email.trim().is_empty() {
        return Err(AppError::validation("email", "邮箱不能为空 / email must not be blank"));
    }
    if raw_password.is_empty() {
        return Err(AppError::validation(
            "password",
            "密码不能为空 / password must not be blank",
        ));
    }

    let normalized = normalize_email(email);
    let user = match store.find_by_email(&normalized).await? {
        Some(user) => user,
        None => return Err(AppError::Credentials),
    };

    if !password::verify_password(&user.password_hash, raw_password)? {
        return Err(AppError::Credentials);
    }

    if !user.is_active {
        return Err(AppError::Credentials);
    }

    Ok(user)
}

/// 为用户签发 token，并同步管理员角色
/// Issue a token for the user and synchronize the admin role
pub async fn login(state: &SaTokenState, user: &User) -> AppResult<String> {
    let login_id = user.id.to_string();

    let token = state
        .manager
        .login(&login_id)
        .await
        .map_err(|e| AppError::external_service("sa-token", e.to_string()))?;

    // 员工/超管账户登录后携带 admin 角色，供角色守卫的管理接口使用
    if user.is_admin() {
        sa_token_core::StpUtil::add_role(&login_id, "admin".to_string())
            .await
            .map_err(|e| AppError::external_service("sa-token", e.to_string()))?;
    }

    tracing::info!(user_id = user.id, email = %user.email, "✅ 用户登录成功 / user logged in");
    Ok(token.to_string())
}

/// 更新账户
/// Update an account
///
/// 新密码走与创建相同的校验与哈希路径。
/// A new password goes through the same validate-and-hash path as
/// creation.
pub async fn update_user(store: &dyn UserStore, id: i64, changes: AccountChanges) -> AppResult<User> {
    let password_hash = match &changes.password {
        Some(raw) => {
            validate_password(raw)?;
            Some(password::hash_password(raw)?)
        }
        None => None,
    };

    let user = store
        .update(
            id,
            UserChanges {
                name: changes.name,
                password_hash,
                is_active: changes.is_active,
                is_staff: changes.is_staff,
                is_superuser: changes.is_superuser,
            },
        )
        .await?;

    tracing::info!(user_id = user.id, "账户更新成功 / account updated");
    Ok(user)
}
