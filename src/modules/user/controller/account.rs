//! 账户注册与 token 签发接口
//! Account registration and token issuance endpoints

use crate::error::ApiResponse;
use crate::modules::user::models::UserInfo;
use crate::modules::user::service::{self, NewAccount};
use crate::modules::user::store::SharedUserStore;
use actix_web::{web, HttpResponse, Responder, Result};
use sa_token_plugin_actix_web::{sa_ignore, SaTokenState};
use serde::{Deserialize, Serialize};

// ==================== 请求/响应类型 ====================
// ==================== Request/Response Types ====================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// ==================== 接口 ====================
// ==================== Endpoints ====================

/// 注册新账户
/// Register a new account
///
/// 响应只包含邮箱和姓名，密码字段永不回显。
#[actix_web::post("/user/create")]
#[sa_ignore]
pub async fn create_account(
    store: web::Data<SharedUserStore>,
    req: web::Json<CreateUserRequest>,
) -> Result<impl Responder> {
    let req = req.into_inner();
    let user = service::create_user(
        store.get_ref().as_ref(),
        NewAccount::regular(req.email, req.password, req.name),
    )
    .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(UserInfo::from(&user))))
}

/// 用邮箱/密码换取 token
/// Exchange email/password for a token
#[actix_web::post("/user/token")]
#[sa_ignore]
pub async fn issue_token(
    state: web::Data<SaTokenState>,
    store: web::Data<SharedUserStore>,
    req: web::Json<TokenRequest>,
) -> Result<impl Responder> {
    let user = service::authenticate(store.get_ref().as_ref(), &req.email, &req.password).await?;
    let token = service::login(state.get_ref(), &user).await?;

    crate::api_success!(TokenResponse { token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::store::memory::MemoryUserStore;
    use crate::modules::user::store::UserStore;
    use actix_web::{test, web, App};
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
                .configure(crate::modules::user::routes::configure_user_routes),
        )
        .await
    }

    #[actix_web::test]
    async fn test_create_user_success() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;

        let req = test::TestRequest::post()
            .uri("/user/create")
            .set_json(serde_json::json!({
                "email": "test@example.com",
                "password": "testpass123",
                "name": "Test Name"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["email"], "test@example.com");
        assert_eq!(body["data"]["name"], "Test Name");
        // 密码不能出现在响应里
        assert!(!body.to_string().contains("password"));

        // 记录已入库且密码哈希可以验证原始密码
        let user = store
            .find_by_email("test@example.com")
            .await
            .unwrap()
            .expect("user persisted");
        assert!(crate::modules::user::password::verify_password(
            &user.password_hash,
            "testpass123"
        )
        .unwrap());
    }

    #[actix_web::test]
    async fn test_create_user_with_existing_email_errors() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;

        let payload = serde_json::json!({
            "email": "test@example.com",
            "password": "testpass123",
            "name": "Test Name"
        });

        let req = test::TestRequest::post()
            .uri("/user/create")
            .set_json(&payload)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        // 相同邮箱再注册一次
        let req = test::TestRequest::post()
            .uri("/user/create")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        // 没有产生第二条记录
        assert_eq!(store.list(None).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_create_user_password_too_short_errors() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;

        let req = test::TestRequest::post()
            .uri("/user/create")
            .set_json(serde_json::json!({
                "email": "test@example.com",
                "password": "pw",
                "name": "Test Name"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        // 确认没有入库
        assert!(store
            .find_by_email("test@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[actix_web::test]
    async fn test_issue_token_for_valid_credentials() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;

        let req = test::TestRequest::post()
            .uri("/user/create")
            .set_json(serde_json::json!({
                "email": "test@example.com",
                "password": "testpass123",
                "name": "Test Name"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        let req = test::TestRequest::post()
            .uri("/user/token")
            .set_json(serde_json::json!({
                "email": "test@example.com",
                "password": "testpass123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: ApiResponse<TokenResponse> = test::read_body_json(resp).await;
        assert_eq!(body.code, 0);
        assert!(!body.data.unwrap().token.is_empty());
    }

    #[actix_web::test]
    async fn test_issue_token_bad_credentials_errors() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;

        let req = test::TestRequest::post()
            .uri("/user/create")
            .set_json(serde_json::json!({
                "email": "test@example.com",
                "password": "goodpass123",
                "name": "Test Name"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        // 密码错误
        let req = test::TestRequest::post()
            .uri("/user/token")
            .set_json(serde_json::json!({
                "email": "test@example.com",
                "password": "wrongpass"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body.get("token").is_none());
        assert!(body["error"]["message"].as_str().is_some());

        // 未注册邮箱
        let req = test::TestRequest::post()
            .uri("/user/token")
            .set_json(serde_json::json!({
                "email": "nobody@example.com",
                "password": "goodpass123"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn test_issue_token_blank_password_errors() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;

        let req = test::TestRequest::post()
            .uri("/user/token")
            .set_json(serde_json::json!({
                "email": "test@example.com",
                "password": ""
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body.get("token").is_none());
    }

    #[actix_web::test]
    async fn test_issue_token_domain_case_is_normalized() {
        let store: SharedUserStore = Arc::new(MemoryUserStore::new());
        let app = create_test_app(store.clone()).await;

        let req = test::TestRequest::post()
            .uri("/user/create")
            .set_json(serde_json::json!({
                "email": "test@example.com",
                "password": "testpass123",
                "name": "Test Name"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        // 域名大小写不同也能登录
        let req = test::TestRequest::post()
            .uri("/user/token")
            .set_json(serde_json::json!({
                "email": "test@EXAMPLE.COM",
                "password": "testpass123"
            }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }
}
