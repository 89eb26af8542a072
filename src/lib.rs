pub mod api;
pub mod error;
pub mod middleware;
#[path = "bootstrap/app_bootstrap.rs"]
pub mod app_bootstrap;
#[path = "bootstrap/command_registry.rs"]
pub mod command_registry;
#[path = "bootstrap/route_registry.rs"]
pub mod route_registry;
pub mod cmd {
    #[path = "../cmd/version.rs"]
    pub mod version;
    pub use version::*;
}
pub mod comm;
pub mod conf;

// Modules
pub mod modules;

/// 初始化所有模块的命令
pub fn init_commands() {
    // 注册base模块的命令
    modules::base::register_base_commands();

    // 注册user模块的命令
    modules::user::register_user_commands();
}

/// 初始化所有模块的路由
pub fn init_routes() {
    // 注册base模块的路由
    modules::base::register_base_routes();

    // 注册user模块的路由
    modules::user::register_user_routes();

    // 注册admin模块的路由
    modules::admin::register_admin_routes();
}

// Re-export bootstrap modules
pub use app_bootstrap::*;
pub use command_registry::*;
pub use route_registry::*;
