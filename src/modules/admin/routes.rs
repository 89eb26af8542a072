use actix_web::web;

use crate::modules::admin::controller;
use crate::register_route;

/// 配置管理模块的路由
/// Configure the admin module routes
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(controller::users::list_users)
        .service(controller::users::create_user)
        .service(controller::users::user_detail)
        .service(controller::users::update_user);
}

/// 注册管理模块的路由到全局注册器
pub fn register_admin_routes() {
    register_route!(
        "admin_users",
        "用户管理接口（需要admin角色）",
        "admin",
        configure_admin_routes
    );
}
