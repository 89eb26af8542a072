use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// 统一的应用错误类型
#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum AppError {
    #[error("配置错误: {0}")]
    Config(#[from] crate::comm::config::ConfigError),

    #[error("认证错误: {message}")]
    Auth { message: String },

    #[error("权限错误: {message}")]
    Permission { message: String },

    #[error("验证错误: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("无法使用提供的凭据进行认证 / Unable to authenticate with provided credentials")]
    Credentials,

    #[error("方法不允许 / Method not allowed")]
    MethodNotAllowed,

    #[error("网络错误: {0}")]
    Network(#[from] actix_web::Error),

    #[error("数据库错误: {message}")]
    Database { message: String },

    #[error("外部服务错误: {service}: {message}")]
    ExternalService { service: String, message: String },

    #[error("超时错误: {operation}")]
    Timeout { operation: String },

    #[error("资源未找到: {resource}")]
    NotFound { resource: String },

    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

#[allow(dead_code)]
impl AppError {
    /// 创建认证错误
    pub fn auth<T: Into<String>>(message: T) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// 创建权限错误
    pub fn permission<T: Into<String>>(message: T) -> Self {
        Self::Permission {
            message: message.into(),
        }
    }

    /// 创建验证错误
    pub fn validation<T: Into<String>, U: Into<String>>(field: T, message: U) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建数据库错误
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// 创建外部服务错误
    pub fn external_service<T: Into<String>, U: Into<String>>(service: T, message: U) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// 创建超时错误
    pub fn timeout<T: Into<String>>(operation: T) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// 创建资源未找到错误
    pub fn not_found<T: Into<String>>(resource: T) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 获取错误代码
    pub fn error_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 1001,
            AppError::Auth { .. } => 1002,
            AppError::Permission { .. } => 1003,
            AppError::Validation { .. } => 1004,
            AppError::Network(_) => 1005,
            AppError::Database { .. } => 1006,
            AppError::ExternalService { .. } => 1007,
            AppError::Timeout { .. } => 1008,
            AppError::NotFound { .. } => 1009,
            AppError::Credentials => 1010,
            AppError::MethodNotAllowed => 1011,
            AppError::Internal(_) => 1000,
        }
    }

    /// 获取HTTP状态码
    pub fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth { .. } => StatusCode::UNAUTHORIZED,
            AppError::Permission { .. } => StatusCode::FORBIDDEN,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            // 凭据错误统一返回400，不泄露是哪个字段出错
            AppError::Credentials => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Network(_) => StatusCode::BAD_GATEWAY,
            AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
            AppError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = AppError::status_code(self);
        let error_code = self.error_code();
        let message = self.to_string();

        // 记录错误日志
        match self {
            AppError::Internal(_) | AppError::Database { .. } => {
                tracing::error!("Internal error: {}", message);
            }
            AppError::ExternalService { .. } => {
                tracing::warn!("External service error: {}", message);
            }
            _ => {
                tracing::info!("Client error: {}", message);
            }
        }

        HttpResponse::build(status).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
                "type": format!("{:?}", self).split(|c| c == '(' || c == ' ').next().unwrap_or("Unknown")
            },
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }
}

/// sa-token 错误到应用错误的转换
/// Convert sa-token errors into the application error taxonomy so the
/// `#[sa_check_login]` / `#[sa_check_role]` macros (which propagate
/// `SaTokenError` via `?`/`.into()`) line up with `AppResult` handlers.
/// Mirrors the existing `AppError::external_service("sa-token", ..)`
/// convention used in the user service for manual conversions.
impl From<sa_token_core::SaTokenError> for AppError {
    fn from(err: sa_token_core::SaTokenError) -> Self {
        use sa_token_core::SaTokenError::*;

        match &err {
            // 认证相关：未登录 / token 无效或过期 -> 401
            NotLogin | TokenNotFound | TokenExpired | TokenInactive | InvalidToken(_)
            | TokenEmpty | TokenTooShort | SessionNotFound | LoginIdNotNumber => {
                AppError::auth(err.to_string())
            }
            // 授权相关：权限 / 角色不足 -> 403
            PermissionDenied | PermissionDeniedDetail(_) | RoleDenied(_) => {
                AppError::permission(err.to_string())
            }
            // 其余情况按外部服务错误处理，与 service 层既有转换保持一致
            _ => AppError::external_service("sa-token", err.to_string()),
        }
    }
}

/// 应用结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 统一的成功响应结构
/// Unified success envelope
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    #[allow(dead_code)]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: -1,
            message: message.into(),
            data: None,
        }
    }
}

/// 便捷宏：创建API成功响应
#[macro_export]
macro_rules! api_success {
    ($data:expr) => {
        Ok(actix_web::web::Json($crate::error::ApiResponse::success(
            $data,
        )))
    };
}
