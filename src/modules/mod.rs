/// 模块管理
/// 包含所有业务模块的定义和导出
pub mod admin;
pub mod base;
pub mod user;

// 选择性重新导出，避免命名冲突
// 只导出主要的公共接口，避免全局导出造成的命名冲突
