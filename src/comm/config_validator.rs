use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 配置验证规则
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValidationRule {
    pub key: String,
    pub required: bool,
    pub data_type: ConfigDataType,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub allowed_values: Option<Vec<String>>,
    pub regex_pattern: Option<String>,
    pub description: String,
}

/// 配置数据类型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConfigDataType {
    String,
    Integer,
    Float,
    Boolean,
    Array,
    Object,
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfiguration {
    pub server_host: String,
    pub server_port: u16,
    pub server_workers: Option<usize>,
    pub server_debug: bool,
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub logging_level: String,
    pub logging_json_format: bool,
    /// token 有效期（秒）
    pub token_timeout_seconds: u64,
    pub redis_url: Option<String>,
    /// 启动时播种的超级管理员账户
    /// Superuser account seeded at startup
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: Option<String>,
}

impl Default for AppConfiguration {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            server_workers: Some(4),
            server_debug: false,
            database_url: None,
            database_max_connections: Some(10),
            logging_level: "info".to_string(),
            logging_json_format: false,
            token_timeout_seconds: 86400,
            redis_url: None,
            admin_email: None,
            admin_password: None,
            admin_name: None,
        }
    }
}

/// 配置验证器
pub struct ConfigValidator {
    rules: HashMap<String, ConfigValidationRule>,
}

#[allow(dead_code)]
impl ConfigValidator {
    /// 创建新的配置验证器
    pub fn new() -> Self {
        let mut rules = HashMap::new();

        // 定义验证规则
        rules.insert(
            "server.host".to_string(),
            ConfigValidationRule {
                key: "server.host".to_string(),
                required: true,
                data_type: ConfigDataType::String,
                min_value: None,
                max_value: None,
                allowed_values: None,
                regex_pattern: Some(r"^[a-zA-Z0-9.-]+$".to_string()),
                description: "服务器主机地址".to_string(),
            },
        );

        rules.insert(
            "server.port".to_string(),
            ConfigValidationRule {
                key: "server.port".to_string(),
                required: true,
                data_type: ConfigDataType::Integer,
                min_value: Some(1024.0),
                max_value: Some(65535.0),
                allowed_values: None,
                regex_pattern: None,
                description: "服务器端口".to_string(),
            },
        );

        rules.insert(
            "logging.level".to_string(),
            ConfigValidationRule {
                key: "logging.level".to_string(),
                required: true,
                data_type: ConfigDataType::String,
                min_value: None,
                max_value: None,
                allowed_values: Some(vec![
                    "trace".to_string(),
                    "debug".to_string(),
                    "info".to_string(),
                    "warn".to_string(),
                    "error".to_string(),
                ]),
                regex_pattern: None,
                description: "日志级别".to_string(),
            },
        );

        rules.insert(
            "admin.email".to_string(),
            ConfigValidationRule {
                key: "admin.email".to_string(),
                required: false,
                data_type: ConfigDataType::String,
                min_value: None,
                max_value: None,
                allowed_values: None,
                regex_pattern: Some(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$".to_string()),
                description: "超级管理员邮箱".to_string(),
            },
        );

        Self { rules }
    }

    /// 验证配置值
    pub fn validate_value(&self, key: &str, value: &serde_json::Value) -> AppResult<()> {
        if let Some(rule) = self.rules.get(key) {
            self.validate_against_rule(rule, value)?;
        }
        Ok(())
    }

    /// 验证整个配置
    pub fn validate_config(&self, config: &AppConfiguration) -> AppResult<()> {
        // 验证服务器主机
        if config.server_host.is_empty() {
            return Err(AppError::validation("server_host", "服务器主机不能为空"));
        }

        // 验证端口范围
        if config.server_port < 1024 {
            return Err(AppError::validation(
                "server_port",
                "端口必须在1024-65535范围内",
            ));
        }

        // 验证工作线程数
        if let Some(workers) = config.server_workers {
            if workers == 0 || workers > 32 {
                return Err(AppError::validation(
                    "server_workers",
                    "工作线程数必须在1-32范围内",
                ));
            }
        }

        // 验证数据库连接池大小
        if let Some(max_conn) = config.database_max_connections {
            if max_conn == 0 || max_conn > 100 {
                return Err(AppError::validation(
                    "database_max_connections",
                    "数据库连接池大小必须在1-100范围内",
                ));
            }
        }

        // 验证日志级别
        if config.logging_level.is_empty() {
            return Err(AppError::validation("logging_level", "日志级别不能为空"));
        }

        // 验证token有效期
        if config.token_timeout_seconds < 300 || config.token_timeout_seconds > 604800 {
            return Err(AppError::validation(
                "token_timeout_seconds",
                "token有效期必须在300-604800秒范围内",
            ));
        }

        // 播种管理员时邮箱和密码必须成对出现
        // Seeded admin needs both email and password
        if config.admin_email.is_some() != config.admin_password.is_some() {
            return Err(AppError::validation(
                "admin",
                "admin.email 和 admin.password 必须同时配置",
            ));
        }

        Ok(())
    }

    /// 根据规则验证值
    fn validate_against_rule(
        &self,
        rule: &ConfigValidationRule,
        value: &serde_json::Value,
    ) -> AppResult<()> {
        // 检查数据类型
        match (&rule.data_type, value) {
            (ConfigDataType::String, serde_json::Value::String(s)) => {
                if let Some(pattern) = &rule.regex_pattern {
                    let regex = regex::Regex::new(pattern).map_err(|e| {
                        AppError::validation(&rule.key, format!("正则表达式错误: {}", e))
                    })?;
                    if !regex.is_match(s) {
                        return Err(AppError::validation(&rule.key, "值不匹配正则表达式"));
                    }
                }

                if let Some(allowed) = &rule.allowed_values {
                    if !allowed.contains(s) {
                        return Err(AppError::validation(
                            &rule.key,
                            format!("值必须是以下之一: {}", allowed.join(", ")),
                        ));
                    }
                }
            }
            (ConfigDataType::Integer, serde_json::Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    let f = i as f64;
                    if let Some(min) = rule.min_value {
                        if f < min {
                            return Err(AppError::validation(
                                &rule.key,
                                format!("值必须大于等于 {}", min),
                            ));
                        }
                    }
                    if let Some(max) = rule.max_value {
                        if f > max {
                            return Err(AppError::validation(
                                &rule.key,
                                format!("值必须小于等于 {}", max),
                            ));
                        }
                    }
                }
            }
            (ConfigDataType::Boolean, serde_json::Value::Bool(_)) => {
                // 布尔值验证通过
            }
            _ => {
                return Err(AppError::validation(
                    &rule.key,
                    format!("数据类型不匹配，期望: {:?}", rule.data_type),
                ));
            }
        }

        Ok(())
    }

    /// 获取所有验证规则
    pub fn get_rules(&self) -> &HashMap<String, ConfigValidationRule> {
        &self.rules
    }

    /// 添加自定义验证规则
    pub fn add_rule(&mut self, rule: ConfigValidationRule) {
        self.rules.insert(rule.key.clone(), rule);
    }
}

/// 环境特定配置加载器
#[allow(dead_code)]
pub struct EnvironmentConfigLoader {
    environment: String,
}

#[allow(dead_code)]
impl EnvironmentConfigLoader {
    /// 创建环境配置加载器
    pub fn new() -> Self {
        let environment = std::env::var("UC_ENV").unwrap_or_else(|_| "development".to_string());

        Self { environment }
    }

    /// 获取当前环境
    pub fn get_environment(&self) -> &str {
        &self.environment
    }

    /// 获取环境特定的配置文件路径
    pub fn get_config_paths(&self) -> Vec<String> {
        vec![
            "config/default.toml".to_string(),
            format!("config/{}.toml", self.environment),
            "config/local.toml".to_string(),
        ]
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 是否为测试环境
    pub fn is_test(&self) -> bool {
        self.environment == "test"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let validator = ConfigValidator::new();
        let config = AppConfiguration::default();

        assert!(validator.validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = AppConfiguration::default();
        config.server_port = 80; // 小于1024

        let validator = ConfigValidator::new();
        assert!(validator.validate_config(&config).is_err());
    }

    #[test]
    fn test_admin_seed_requires_both_fields() {
        let mut config = AppConfiguration::default();
        config.admin_email = Some("admin@example.com".to_string());

        let validator = ConfigValidator::new();
        assert!(validator.validate_config(&config).is_err());

        config.admin_password = Some("adminpass123".to_string());
        assert!(validator.validate_config(&config).is_ok());
    }

    #[test]
    fn test_environment_loader() {
        let loader = EnvironmentConfigLoader::new();
        let paths = loader.get_config_paths();

        assert!(paths.len() >= 3);
        assert!(paths.iter().any(|p| p.contains("default")));
    }
}
