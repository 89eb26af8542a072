/// 运维接口模块
/// Operational API module

pub mod metrics;
pub mod swagger;
