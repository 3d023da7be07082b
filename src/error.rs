//! 调用错误类型
//!
//! 定义分组调用与故障转移过程中可能发生的错误

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 调用错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RpcError {
    /// 传输层失败（连接断开、写超时等）
    #[error("传输失败: {message}")]
    Transport { message: String, retry: bool },

    /// 服务端过载，自身标记为可重试
    #[error("服务端过载: {0}")]
    Overload(String),

    /// 业务异常
    #[error("业务异常: {0}")]
    Business(String),

    /// 请求超时
    #[error("请求超时: {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// 重试次数耗尽
    #[error("Maximum number {max_retry} of retries reached")]
    RetriesExhausted { max_retry: u32 },

    /// 重试后没有可用节点
    #[error("there is not any node after retrying {attempts}")]
    NoAvailableNode { attempts: u32, retry: bool },

    /// 序列化失败
    #[error("序列化失败: {0}")]
    Codec(String),

    /// 分组引用初始化失败
    #[error("分组 {alias} 初始化失败: {message}")]
    Setup { alias: String, message: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 调用器尚未就绪
    #[error("调用器未就绪: {0}")]
    NotReady(String),

    /// 调用器已关闭
    #[error("调用器已关闭")]
    Closed,

    /// 调用被取消
    #[error("调用已取消")]
    Cancelled,
}

/// 错误分类，用于配置驱动的异常策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Overload,
    Business,
    Timeout,
    RetriesExhausted,
    NoAvailableNode,
    Codec,
    Setup,
    Config,
    NotReady,
    Closed,
    Cancelled,
}

impl RpcError {
    /// 创建传输错误
    pub fn transport(message: impl Into<String>, retry: bool) -> Self {
        RpcError::Transport {
            message: message.into(),
            retry,
        }
    }

    /// 创建业务异常
    pub fn business(message: impl Into<String>) -> Self {
        RpcError::Business(message.into())
    }

    /// 错误自身是否标记为可重试
    pub fn is_retry(&self) -> bool {
        match self {
            RpcError::Transport { retry, .. } => *retry,
            RpcError::Overload(_) => true,
            RpcError::NoAvailableNode { retry, .. } => *retry,
            _ => false,
        }
    }

    /// 获取错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            RpcError::Transport { .. } => ErrorKind::Transport,
            RpcError::Overload(_) => ErrorKind::Overload,
            RpcError::Business(_) => ErrorKind::Business,
            RpcError::Timeout { .. } => ErrorKind::Timeout,
            RpcError::RetriesExhausted { .. } => ErrorKind::RetriesExhausted,
            RpcError::NoAvailableNode { .. } => ErrorKind::NoAvailableNode,
            RpcError::Codec(_) => ErrorKind::Codec,
            RpcError::Setup { .. } => ErrorKind::Setup,
            RpcError::Config(_) => ErrorKind::Config,
            RpcError::NotReady(_) => ErrorKind::NotReady,
            RpcError::Closed => ErrorKind::Closed,
            RpcError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// 获取错误类型字符串
    pub fn error_type(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Transport => "transport_error",
            ErrorKind::Overload => "overload_error",
            ErrorKind::Business => "business_error",
            ErrorKind::Timeout => "timeout_error",
            ErrorKind::RetriesExhausted => "retries_exhausted",
            ErrorKind::NoAvailableNode => "no_available_node",
            ErrorKind::Codec => "codec_error",
            ErrorKind::Setup => "setup_error",
            ErrorKind::Config => "config_error",
            ErrorKind::NotReady => "not_ready",
            ErrorKind::Closed => "closed",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

/// 故障转移过程中合成的错误构造函数
///
/// 以函数指针注入调用器，便于在不构造整个调用器的情况下测试。
#[derive(Debug, Clone, Copy)]
pub struct FailureFactory {
    /// 超过最大重试次数，参数为配置的 max_retry
    pub overload: fn(u32) -> RpcError,
    /// 没有可用节点，参数为当前重试次数和是否可重试
    pub empty: fn(u32, bool) -> RpcError,
}

/// 超过最大重试次数
pub fn overload_failure(max_retry: u32) -> RpcError {
    RpcError::RetriesExhausted { max_retry }
}

/// 负载均衡没有选择出合适的节点
pub fn empty_node_failure(attempts: u32, retry: bool) -> RpcError {
    RpcError::NoAvailableNode { attempts, retry }
}

impl Default for FailureFactory {
    fn default() -> Self {
        Self {
            overload: overload_failure,
            empty: empty_node_failure,
        }
    }
}
