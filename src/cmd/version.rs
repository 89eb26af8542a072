/// 显示版本信息
/// Print version information
pub fn handle_version_command() {
    println!("uc-rust v{}", env!("CARGO_PKG_VERSION"));
    println!("基于 Rust 的用户账户中心服务");
}
