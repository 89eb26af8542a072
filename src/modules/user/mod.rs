/// User 模块
/// 账户存储、凭据服务与用户 API
/// Account store, credential service and the user-facing API

pub mod cmd;
pub mod controller;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
pub mod store;

/// 注册user模块的路由
pub fn register_user_routes() {
    routes::register_user_routes();
}

/// 注册user模块的命令
pub fn register_user_commands() {
    cmd::register_user_commands();
}
