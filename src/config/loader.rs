//! 配置加载器
//!
//! 按文件扩展名选择 YAML 或 JSON 解析

use super::types::ClusterConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "cluster.yaml";

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("无法读取配置文件 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML 解析失败: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("不支持的配置文件格式: {0}")]
    UnsupportedFormat(String),

    #[error("配置无效: {0}")]
    Invalid(String),
}

/// 默认配置文件路径: <config_dir>/rpc-cluster/cluster.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rpc-cluster")
        .join(DEFAULT_CONFIG_FILE)
}

/// 从文件加载并校验集群配置
pub fn load_config(path: &Path) -> Result<ClusterConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let config: ClusterConfig = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        "json" => serde_json::from_str(&content)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };

    config.validate().map_err(ConfigError::Invalid)?;

    tracing::info!(
        "[CONFIG] 加载配置 {}: interface={}, aliases={}",
        path.display(),
        config.consumer.interface,
        config.consumer.aliases.len()
    );

    Ok(config)
}
