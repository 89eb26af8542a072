//! 用户管理接口（管理员）
//! User administration endpoints (admin role required)
//!
//! 与公开 API 共用同一套校验和哈希路径，管理员也绕不过密码长度
//! 和邮箱唯一性。
//! Shares the validation and hashing path with the public API; admins do
//! not get to bypass password length or email uniqueness.

use crate::error::{ApiResponse, AppError, AppResult};
use crate::modules::user::service::{self, AccountChanges, NewAccount};
use crate::modules::user::store::{SharedUserStore, UserStore};
use actix_web::{web, HttpResponse, Responder};
use sa_token_plugin_actix_web::sa_check_role;
use serde::Deserialize;

// ==================== 请求类型 ====================
// ==================== Request Types ====================

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// 姓名/邮箱的大小写不敏感子串过滤
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminCreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

// ==================== 接口 ====================
// ==================== Endpoints ====================

/// 列出用户，可按姓名/邮箱搜索
/// List users, optionally filtered by name/email
#[actix_web::get("/admin/users")]
#[sa_check_role("admin")]
pub async fn list_users(
    store: web::Data<SharedUserStore>,
    query: web::Query<ListUsersQuery>,
) -> AppResult<impl Responder> {
    let users = store
        .get_ref()
        .list(query.search.as_deref())
        .await
        .map_err(AppError::from)?;

    crate::api_success!(users)
}

/// 查看单个用户
/// Inspect a single user
#[actix_web::get("/admin/users/{id}")]
#[sa_check_role("admin")]
pub async fn user_detail(
    store: web::Data<SharedUserStore>,
    path: web::Path<i64>,
) -> AppResult<impl Responder> {
    let id = path.into_inner();
    let user = store
        .get_ref()
        .find_by_id(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("user"))?;

    crate::api_success!(user)
}

/// 创建用户（可选带管理标志）
/// Create a user, optionally with admin flags
#[actix_web::post("/admin/users")]
#[sa_check_role("admin")]
pub async fn create_user(
    store: web::Data<SharedUserStore>,
    req: web::Json<AdminCreateUserRequest>,
) -> AppResult<impl Responder> {
    let req = req.into_inner();
    let user = service::create_user(
        store.get_ref().as_ref(),
        NewAccount {
            email: req.email,
            password: req.password,
            name: req.name,
            is_staff: req.is_staff.unwrap_or(false),
            is_superuser: req.is_superuser.unwrap_or(false),
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(user)))
}

/// 编辑用户（姓名、密码、激活与管理标志）
/// Edit a user: name, password, activation and admin flags
#[actix_web::put("/admin/users/{id}")]
#[sa_check_role("admin")]
pub async fn update_user(
    store: web::Data<SharedUserStore>,
    path: web::Path<i64>,
    req: web::Json<AdminUpdateUserRequest>,
) -> AppResult<impl Responder> {
    let id = path.into_inner();
    let req = req.into_inner();

    let user = service::update_user(
        store.get_ref().as_ref(),
        id,
        AccountChanges {
            name: req.name,
            password: req.password,
            is_active: req.is_active,
            is_staff: req.is_staff,
            is_superuser: req.is_superuser,
        },
    )
    .await?;

    crate::api_success!(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::store::memory::MemoryUserStore;
    use actix_web::http::header;
    use actix_web::{test, web, App};
    use sa_token_plugin_actix_web::SaTokenState;
    use std::sync::Arc;

    async fn create_test_app(
        store: SharedUserStore,
    ) -> impl actix_web::dev::Service<
        actix_web::dev::ServiceRequest,
        Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
        Error = actix_web::Error,
    > {
        let manager = crate::conf::init_sa_token(None, crate::conf::DEFAULT_TOKEN_TIMEOUT_SECONDS)
            .await
            .expect("sa-token init");
        let sa_token_state = SaTokenState { manager };

        test::init_service(
            App::new()
                .app_data(web::Data::new(sa_token_state))
                .app_data(web::Data::new(store))
                .configure(crate::modules::user::routes::configure_user_routes)
                .configure(crate::modules::admin::routes::configure_admin_routes),
        )
        .await
    }

    /// 直接在存储里建账户，再走 token 接口登录
    async fn login(
        app: &impl actix_web::dev::Service<
            actix_web::dev::ServiceRequest,
            Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
            Error = actix_web::Error,
        >,
        email: &str,
        password: &str,
    ) -> String {
        let req = test::TestRequest::post()
            .uri("/user/token")
            .set_json(serde_json::json!({
                "email": email,
                "password": password
            }))
            .to_request();
        let resp = test::call_service(app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        body["data"]["token"].as_str().expect("token issued").to_string()
    }

    async fn seed_admin(store: &SharedUserStore) {
        service::create_user(
            store.as_ref(),
            NewAccount {
                email: "admin@example.com".to_string(),
                password: "adminpass123".to_string(),
                name: "Admin".to_string(),
                is_staff: true,
                is_superuser: true,
            },
        )
        .await
        .unwrap();
    }

    #[actix_web::test]
    async fn test_admin_routes_reject_anonymous_and_regular_users() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;

        // 未登录
        let req = test::TestRequest::get().uri("/admin/users").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());

        // 普通用户登录后同样被拒
        service::create_user(
            store.as_ref(),
            NewAccount::regular("user@example.com", "testpass123", "Test User"),
        )
        .await
        .unwrap();
        let token = login(&app, "user@example.com", "testpass123").await;

        let req = test::TestRequest::get()
            .uri("/admin/users")
            .insert_header((header::AUTHORIZATION, token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    async fn test_admin_lists_users_with_name_and_email() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;
        seed_admin(&store).await;
        service::create_user(
            store.as_ref(),
            NewAccount::regular("user@example.com", "testpass123", "Test User"),
        )
        .await
        .unwrap();

        let token = login(&app, "admin@example.com", "adminpass123").await;
        let req = test::TestRequest::get()
            .uri("/admin/users")
            .insert_header((header::AUTHORIZATION, token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        let rendered = body.to_string();
        assert!(rendered.contains("Test User"));
        assert!(rendered.contains("user@example.com"));
        // 密码哈希不出现在管理端响应里
        assert!(!rendered.contains("password_hash"));
    }

    #[actix_web::test]
    async fn test_admin_search_filters_users() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;
        seed_admin(&store).await;
        service::create_user(
            store.as_ref(),
            NewAccount::regular("alice@example.com", "testpass123", "Alice"),
        )
        .await
        .unwrap();
        service::create_user(
            store.as_ref(),
            NewAccount::regular("bob@example.com", "testpass123", "Bob"),
        )
        .await
        .unwrap();

        let token = login(&app, "admin@example.com", "adminpass123").await;
        let req = test::TestRequest::get()
            .uri("/admin/users?search=alice")
            .insert_header((header::AUTHORIZATION, token))
            .to_request();
        let body: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;

        let users = body["data"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["email"], "alice@example.com");
    }

    #[actix_web::test]
    async fn test_admin_creates_user_with_same_validation() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;
        seed_admin(&store).await;
        let token = login(&app, "admin@example.com", "adminpass123").await;

        // 正常创建
        let req = test::TestRequest::post()
            .uri("/admin/users")
            .insert_header((header::AUTHORIZATION, token.clone()))
            .set_json(serde_json::json!({
                "email": "staff@example.com",
                "password": "staffpass123",
                "name": "Staff",
                "is_staff": true
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let created = store
            .find_by_email("staff@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(created.is_staff);
        assert!(!created.is_superuser);

        // 短密码同样被拒
        let req = test::TestRequest::post()
            .uri("/admin/users")
            .insert_header((header::AUTHORIZATION, token))
            .set_json(serde_json::json!({
                "email": "short@example.com",
                "password": "pw",
                "name": "Short"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
        assert!(store
            .find_by_email("short@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[actix_web::test]
    async fn test_admin_edits_user_and_rehashes_password() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;
        seed_admin(&store).await;
        let user = service::create_user(
            store.as_ref(),
            NewAccount::regular("user@example.com", "oldpass123", "Old Name"),
        )
        .await
        .unwrap();

        let token = login(&app, "admin@example.com", "adminpass123").await;
        let req = test::TestRequest::put()
            .uri(&format!("/admin/users/{}", user.id))
            .insert_header((header::AUTHORIZATION, token))
            .set_json(serde_json::json!({
                "name": "New Name",
                "password": "newpass123",
                "is_active": false
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["name"], "New Name");
        assert_eq!(body["data"]["is_active"], false);

        let stored = store.find_by_id(user.id).await.unwrap().unwrap();
        assert!(crate::modules::user::password::verify_password(
            &stored.password_hash,
            "newpass123"
        )
        .unwrap());
        assert!(!stored.is_active);
    }

    #[actix_web::test]
    async fn test_admin_user_detail_unknown_id_is_404() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;
        seed_admin(&store).await;

        let token = login(&app, "admin@example.com", "adminpass123").await;
        let req = test::TestRequest::get()
            .uri("/admin/users/999")
            .insert_header((header::AUTHORIZATION, token))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }
}
