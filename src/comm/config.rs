// 配置管理核心模块 / Core configuration management module
//
//! 基于 config crate 的分层配置管理器
//! Layered configuration manager built on the config crate
//!
//! 配置优先级（后加载的覆盖先加载的）：
//! Priority (later sources override earlier ones):
//!   1. config/default.toml（必需 / required）
//!   2. config/{UC_ENV}.toml
//!   3. config/local.toml
//!   4. UC_ 前缀的环境变量 / UC_-prefixed environment variables

use config::{Config, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置初始化失败: {message}")]
    InitializationError { message: String },

    #[error("配置项不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置解析失败: {0}")]
    ParseError(#[from] config::ConfigError),
}

/// 配置源定义
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// 配置文件源
    File {
        path: String,
        format: Option<FileFormat>,
        required: bool,
    },
    /// 环境变量源
    Env { prefix: String, separator: String },
}

/// 配置管理器
pub struct ConfigManager {
    config: Config,
    sources: Vec<ConfigSource>,
}

impl ConfigManager {
    /// 使用给定的配置源构建管理器
    /// Build a manager from the given sources
    pub fn with_sources(sources: Vec<ConfigSource>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for source in &sources {
            match source {
                ConfigSource::File {
                    path,
                    format,
                    required,
                } => {
                    let file = match format {
                        Some(fmt) => File::new(path, *fmt).required(*required),
                        None => File::with_name(path).required(*required),
                    };
                    builder = builder.add_source(file);
                }
                ConfigSource::Env { prefix, separator } => {
                    builder = builder
                        .add_source(Environment::with_prefix(prefix).separator(separator));
                }
            }
        }

        let config = builder
            .build()
            .map_err(|e| ConfigError::InitializationError {
                message: e.to_string(),
            })?;

        Ok(Self { config, sources })
    }

    /// 获取任意可反序列化的配置值
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        self.config.get::<T>(key).map_err(|e| match e {
            config::ConfigError::NotFound(_) => ConfigError::KeyNotFound {
                key: key.to_string(),
            },
            other => ConfigError::ParseError(other),
        })
    }

    /// 获取字符串配置值
    pub fn get_string(&self, key: &str) -> Result<String, ConfigError> {
        self.get::<String>(key)
    }

    /// 获取配置值，不存在时返回默认值
    /// Get a value, falling back to the default when missing
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get::<T>(key).unwrap_or(default)
    }

    /// 判断配置项是否存在
    pub fn exists(&self, key: &str) -> bool {
        self.config.get::<config::Value>(key).is_ok()
    }

    /// 打印配置源信息
    pub fn print_sources_info(&self) {
        tracing::info!("配置源 ({} 个):", self.sources.len());
        for source in &self.sources {
            match source {
                ConfigSource::File { path, required, .. } => {
                    tracing::info!(
                        "  - 文件: {} ({})",
                        path,
                        if *required { "必需" } else { "可选" }
                    );
                }
                ConfigSource::Env { prefix, .. } => {
                    tracing::info!("  - 环境变量: {}_*", prefix);
                }
            }
        }
    }
}

/// 默认的配置源列表
/// Default source list used by the global manager
fn default_sources() -> Vec<ConfigSource> {
    let environment = std::env::var("UC_ENV").unwrap_or_else(|_| "development".to_string());

    vec![
        ConfigSource::File {
            path: "config/default.toml".to_string(),
            format: Some(FileFormat::Toml),
            required: false,
        },
        ConfigSource::File {
            path: format!("config/{}.toml", environment),
            format: Some(FileFormat::Toml),
            required: false,
        },
        ConfigSource::File {
            path: "config/local.toml".to_string(),
            format: Some(FileFormat::Toml),
            required: false,
        },
        ConfigSource::Env {
            prefix: "UC".to_string(),
            separator: "_".to_string(),
        },
    ]
}

// 全局配置管理器单例
static GLOBAL_CONFIG_MANAGER: OnceLock<Arc<ConfigManager>> = OnceLock::new();

/// 获取全局配置管理器
/// Get the global configuration manager singleton
pub fn get_global_config_manager() -> Result<Arc<ConfigManager>, ConfigError> {
    if let Some(manager) = GLOBAL_CONFIG_MANAGER.get() {
        return Ok(manager.clone());
    }

    let manager = Arc::new(ConfigManager::with_sources(default_sources())?);
    // 并发初始化时保留先到者
    let _ = GLOBAL_CONFIG_MANAGER.set(manager.clone());
    Ok(GLOBAL_CONFIG_MANAGER
        .get()
        .expect("global config manager just initialized")
        .clone())
}
