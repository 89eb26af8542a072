/// Admin 模块
/// 用户管理接口与超级管理员播种
/// User administration API and superuser seeding

pub mod controller;
pub mod routes;
pub mod seed;

/// 注册admin模块的路由
pub fn register_admin_routes() {
    routes::register_admin_routes();
}
