use actix_web::{web, HttpResponse, Responder, Result};
use sa_token_plugin_actix_web::sa_ignore;
use serde_json::json;

use crate::register_route;

/// 服务首页
#[actix_web::get("/base")]
#[sa_ignore]
pub async fn base_index() -> Result<impl Responder> {
    Ok(HttpResponse::Ok().json(json!({
        "message": "欢迎访问用户账户中心 / welcome to the user account center",
        "module": "base",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/user/create",
            "/user/token",
            "/user/me",
            "/admin/users",
            "/health",
            "/metrics"
        ]
    })))
}

/// 获取服务信息
#[actix_web::get("/base/info")]
#[sa_ignore]
pub async fn base_info() -> Result<impl Responder> {
    Ok(HttpResponse::Ok().json(json!({
        "module": "base",
        "description": "用户注册、token认证与资料管理服务",
        "features": [
            "账户注册",
            "token签发与校验",
            "资料自助管理",
            "用户管理接口"
        ],
        "author": "UC Team",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

/// 配置base模块的路由（含运维指标接口）
/// Configure base module routes, operational metrics included
pub fn configure_base_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(base_index).service(base_info);

    // 性能指标与健康检查
    cfg.route("/metrics", web::get().to(crate::api::metrics::get_metrics))
        .route(
            "/metrics/report",
            web::get().to(crate::api::metrics::get_performance_report),
        )
        .route(
            "/metrics/reset",
            web::post().to(crate::api::metrics::reset_metrics),
        )
        .route(
            "/health",
            web::get().to(crate::api::metrics::health_check_with_metrics),
        );
}

/// 注册base模块的路由到全局注册器
pub fn register_base_routes() {
    register_route!("base", "服务首页、健康检查与性能指标", "base", configure_base_routes);
}
