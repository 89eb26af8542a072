/// Base 模块
/// 包含基础功能和通用组件

pub mod cmd;
pub mod routes;

/// 注册base模块的路由
pub fn register_base_routes() {
    routes::register_base_routes();
}

/// 注册base模块的命令
pub fn register_base_commands() {
    cmd::register_base_commands();
}
