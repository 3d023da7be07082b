//! 配置模块
//!
//! 集群配置的数据模型和 YAML/JSON 加载

mod loader;
mod types;

pub use loader::{default_config_path, load_config, ConfigError, DEFAULT_CONFIG_FILE};
pub use types::{
    ClusterConfig, ConsumerConfig, FailoverConfig, LoggingConfig, MethodConfig,
    DEFAULT_CLUSTER, DEFAULT_TIMEOUT_MS, DEFAULT_TIMEOUT_POLICY,
};

#[cfg(test)]
mod tests;
