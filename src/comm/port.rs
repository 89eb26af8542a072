use std::process::Command;

/// 同步检查端口是否可用（通过系统命令）
///
/// # 参数
/// * `port` - 要检查的端口号
///
/// # 返回值
/// * `bool` - 端口是否可用，true 表示可用，false 表示被占用
pub fn is_port_available_sync(port: u16) -> bool {
    // 检测当前操作系统平台
    if cfg!(target_os = "windows") {
        // Windows 平台使用 netstat 命令检查端口
        match Command::new("cmd")
            .args(["/C", &format!("netstat -ano | findstr :{}", port)])
            .output()
        {
            Ok(output) => {
                let result = String::from_utf8_lossy(&output.stdout);
                // 如果端口只处于 TIME_WAIT 状态，则认为端口可用
                result.is_empty() || result.to_lowercase().contains("time_wait")
            }
            Err(_) => {
                // 命令执行失败，认为端口可用
                true
            }
        }
    } else {
        // Linux/Mac 平台使用 lsof 命令检查端口，只检查 LISTEN 状态
        match Command::new("lsof")
            .args(["-i", &format!(":{}", port), "-sTCP:LISTEN"])
            .output()
        {
            Ok(output) => {
                let result = String::from_utf8_lossy(&output.stdout);
                result.is_empty()
            }
            Err(_) => {
                // 命令执行失败，认为端口可用
                true
            }
        }
    }
}

/// 查找可用端口（同步）
///
/// 从起始端口向上最多探测16个端口，全部被占用时退回起始端口。
///
/// # 参数
/// * `start_port` - 起始端口号
///
/// # 返回值
/// * `u16` - 找到的可用端口号
pub fn available_port(start_port: u16) -> u16 {
    let end = start_port.saturating_add(16);
    let mut port = start_port;

    while port <= end {
        if is_port_available_sync(port) {
            if port != start_port {
                tracing::warn!(
                    "端口 {} 被占用，改用端口 {} / port {} occupied, using {}",
                    start_port,
                    port,
                    start_port,
                    port
                );
            }
            return port;
        }
        port += 1;
    }

    start_port
}
