//! 个人资料自助接口
//! Profile self-service endpoints
//!
//! 所有 /user/me 操作都要求有效 token，调用者只能触达自己的记录。
//! Every /user/me operation requires a valid token; a caller can only
//! ever reach their own record.

use crate::error::{AppError, AppResult};
use crate::modules::user::models::{User, UserInfo};
use crate::modules::user::service::{self, AccountChanges};
use crate::modules::user::store::{SharedUserStore, UserStore};
use actix_web::{web, HttpResponse, Responder};
use sa_token_plugin_actix_web::{sa_check_login, sa_ignore, LoginIdExtractor};
use serde::Deserialize;

/// 资料部分更新请求
/// Partial profile update request
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// 从会话里的登录ID解析出当前用户
/// Resolve the current user from the session login id
async fn current_user(store: &dyn UserStore, login_id: &str) -> AppResult<User> {
    let id: i64 = login_id
        .parse()
        .map_err(|_| AppError::auth("无效的会话 / invalid session"))?;

    match store.find_by_id(id).await? {
        Some(user) => Ok(user),
        // token 还在但账户已经不存在，按无效会话处理
        None => Err(AppError::auth("会话对应的用户不存在 / session user no longer exists")),
    }
}

/// 查看自己的资料
/// Read own profile
#[actix_web::get("/user/me")]
#[sa_check_login]
pub async fn me_detail(
    store: web::Data<SharedUserStore>,
    login_id: LoginIdExtractor,
) -> AppResult<impl Responder> {
    let user = current_user(store.get_ref().as_ref(), &login_id.0).await?;

    crate::api_success!(UserInfo::from(&user))
}

/// 更新自己的资料（姓名、密码，均可省略）
/// Update own profile; name and password are both optional
#[actix_web::patch("/user/me")]
#[sa_check_login]
pub async fn me_update(
    store: web::Data<SharedUserStore>,
    login_id: LoginIdExtractor,
    req: web::Json<UpdateProfileRequest>,
) -> AppResult<impl Responder> {
    let user = current_user(store.get_ref().as_ref(), &login_id.0).await?;
    let req = req.into_inner();

    let updated = service::update_user(
        store.get_ref().as_ref(),
        user.id,
        AccountChanges {
            name: req.name,
            password: req.password,
            ..Default::default()
        },
    )
    .await?;

    crate::api_success!(UserInfo::from(&updated))
}

/// 资料接口不支持 POST，无论是否登录都返回 405
/// POST on the profile endpoint is always 405, authenticated or not
#[actix_web::post("/user/me")]
#[sa_ignore]
pub async fn me_create_not_allowed() -> Result<HttpResponse> {
    Err(AppError::MethodNotAllowed.into())
}
