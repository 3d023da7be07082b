//! 配置数据模型

use crate::error::ErrorKind;
use crate::resilience::{DEFAULT_MAX_RETRY, DEFAULT_RETRY_ERRORS};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 默认集群策略
pub const DEFAULT_CLUSTER: &str = "failover";

/// 默认调用超时（毫秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// 默认超时策略
pub const DEFAULT_TIMEOUT_POLICY: &str = "remaining";

/// 集群配置根节点
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub consumer: ConsumerConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// 日志级别：trace / debug / info / warn / error
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 是否输出 target
    #[serde(default)]
    pub with_target: bool,
    /// 是否启用 ANSI 颜色
    #[serde(default = "default_true")]
    pub ansi: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            with_target: false,
            ansi: true,
        }
    }
}

/// 消费者配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumerConfig {
    /// 服务接口名
    pub interface: String,
    /// 分组别名，每个别名对应一个独立寻址的服务分组
    pub aliases: Vec<String>,
    /// 集群策略名称
    #[serde(default = "default_cluster")]
    pub cluster: String,
    /// 是否动态自适应分组（故障转移调用器不支持）
    #[serde(default)]
    pub alias_adaptive: bool,
    /// 默认调用超时（毫秒）
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// 默认故障转移配置
    #[serde(default)]
    pub failover: FailoverConfig,
    /// 方法级覆盖配置
    #[serde(default)]
    pub methods: HashMap<String, MethodConfig>,
}

fn default_cluster() -> String {
    DEFAULT_CLUSTER.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ConsumerConfig {
    pub fn new(interface: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            interface: interface.into(),
            aliases,
            cluster: default_cluster(),
            alias_adaptive: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            failover: FailoverConfig::default(),
            methods: HashMap::new(),
        }
    }

    /// 校验配置，返回第一个发现的问题
    pub fn validate(&self) -> Result<(), String> {
        if self.interface.trim().is_empty() {
            return Err("interface 不能为空".to_string());
        }
        if self.aliases.is_empty() {
            return Err(format!("接口 {} 没有配置任何分组", self.interface));
        }
        let mut seen = HashSet::new();
        for alias in &self.aliases {
            if !seen.insert(alias.as_str()) {
                return Err(format!("分组 {} 重复配置", alias));
            }
        }
        if self.timeout_ms == 0 {
            return Err("timeout_ms 必须大于 0".to_string());
        }
        for (name, method) in &self.methods {
            if method.timeout_ms == Some(0) {
                return Err(format!("方法 {} 的 timeout_ms 必须大于 0", name));
            }
        }
        Ok(())
    }

    /// 合并方法级配置，返回该方法生效的超时和故障转移配置
    pub fn resolve_method(&self, method_name: &str) -> (u64, FailoverConfig) {
        match self.methods.get(method_name) {
            Some(method) => (
                method.timeout_ms.unwrap_or(self.timeout_ms),
                self.failover.merge(method),
            ),
            None => (self.timeout_ms, self.failover.clone()),
        }
    }
}

/// 故障转移配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailoverConfig {
    /// 最大重试次数
    #[serde(default = "default_max_retry")]
    pub max_retry: u32,
    /// 每个节点只重试一次
    #[serde(default)]
    pub only_once_per_node: bool,
    /// 超时策略名称
    #[serde(default = "default_timeout_policy")]
    pub timeout_policy: String,
    /// 可重试的错误分类
    #[serde(default = "default_retry_errors")]
    pub retry_errors: Vec<ErrorKind>,
    /// 错误消息命中这些关键词时可重试
    #[serde(default)]
    pub retry_keywords: Vec<String>,
}

fn default_max_retry() -> u32 {
    DEFAULT_MAX_RETRY
}

fn default_timeout_policy() -> String {
    DEFAULT_TIMEOUT_POLICY.to_string()
}

fn default_retry_errors() -> Vec<ErrorKind> {
    DEFAULT_RETRY_ERRORS.to_vec()
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            max_retry: default_max_retry(),
            only_once_per_node: false,
            timeout_policy: default_timeout_policy(),
            retry_errors: default_retry_errors(),
            retry_keywords: Vec::new(),
        }
    }
}

impl FailoverConfig {
    /// 用方法级配置覆盖默认值
    pub fn merge(&self, method: &MethodConfig) -> FailoverConfig {
        FailoverConfig {
            max_retry: method.max_retry.unwrap_or(self.max_retry),
            only_once_per_node: method.only_once_per_node.unwrap_or(self.only_once_per_node),
            timeout_policy: method
                .timeout_policy
                .clone()
                .unwrap_or_else(|| self.timeout_policy.clone()),
            retry_errors: method
                .retry_errors
                .clone()
                .unwrap_or_else(|| self.retry_errors.clone()),
            retry_keywords: method
                .retry_keywords
                .clone()
                .unwrap_or_else(|| self.retry_keywords.clone()),
        }
    }
}

/// 方法级配置，未设置的字段继承消费者默认值
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MethodConfig {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub max_retry: Option<u32>,
    #[serde(default)]
    pub only_once_per_node: Option<bool>,
    #[serde(default)]
    pub timeout_policy: Option<String>,
    #[serde(default)]
    pub retry_errors: Option<Vec<ErrorKind>>,
    #[serde(default)]
    pub retry_keywords: Option<Vec<String>>,
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.consumer.validate()
    }
}
