use actix_web::web;

use crate::modules::user::controller;
use crate::register_route;

/// 配置用户模块的路由
/// Configure the user module routes
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(controller::account::create_account)
        .service(controller::account::issue_token)
        .service(controller::profile::me_detail)
        .service(controller::profile::me_update)
        // 同一路径的 POST 显式注册为 405
        .service(controller::profile::me_create_not_allowed);
}

/// 注册用户模块的路由到全局注册器
pub fn register_user_routes() {
    register_route!(
        "user_api",
        "用户注册、token签发与个人资料接口",
        "user",
        configure_user_routes
    );
}
