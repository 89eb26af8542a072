// 用户账户模型 / User account model
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 用户账户记录
///
/// 邮箱是登录标识，入库前已规范化（域名部分小写）。
/// The email is the login identifier, normalized (domain lowercased)
/// before it reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    // 序列化时永远不输出密码哈希
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// 是否具备管理员权限
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// 待插入的用户记录（id 与审计列由存储层生成）
/// Record to insert; id and audit columns come from the store
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// 用户记录的部分更新
/// Partial update of a user record
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// 对外暴露的用户信息（不含密码相关字段）
/// Public user view, no password material
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub email: String,
    pub name: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}
