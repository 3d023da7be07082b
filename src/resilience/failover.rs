//! 故障转移策略实现
//!
//! 提供最大重试次数、异常分类和超时策略的声明式配置

use super::timeout::{RemainingTimeoutPolicy, TimeoutPolicy};
use crate::error::{ErrorKind, RpcError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// 默认最大重试次数
pub const DEFAULT_MAX_RETRY: u32 = 1;

/// 默认可重试的错误分类
pub const DEFAULT_RETRY_ERRORS: &[ErrorKind] =
    &[ErrorKind::Transport, ErrorKind::Overload, ErrorKind::Timeout];

/// 集群路由模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// 快速失败，首次失败即返回
    #[default]
    FailFast,
    /// 失败后切换重试
    Failover,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::FailFast => write!(f, "failfast"),
            Route::Failover => write!(f, "failover"),
        }
    }
}

/// 异常策略：判断失败是否可重试
pub trait ExceptionPolicy: Send + Sync {
    fn test(&self, err: &RpcError) -> bool;
}

impl<F> ExceptionPolicy for F
where
    F: Fn(&RpcError) -> bool + Send + Sync,
{
    fn test(&self, err: &RpcError) -> bool {
        self(err)
    }
}

/// 按错误分类和错误消息关键词判断是否可重试
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorKindPolicy {
    kinds: HashSet<ErrorKind>,
    /// 小写关键词，命中错误消息即视为可重试
    keywords: Vec<String>,
}

impl ErrorKindPolicy {
    pub fn new(kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            keywords: Vec::new(),
        }
    }

    /// 追加错误消息关键词
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords
            .extend(keywords.into_iter().map(|k| k.as_ref().to_lowercase()));
        self
    }

    pub fn kinds(&self) -> &HashSet<ErrorKind> {
        &self.kinds
    }
}

impl ExceptionPolicy for ErrorKindPolicy {
    fn test(&self, err: &RpcError) -> bool {
        if self.kinds.contains(&err.kind()) {
            return true;
        }
        if self.keywords.is_empty() {
            return false;
        }
        let message = err.to_string().to_lowercase();
        self.keywords.iter().any(|k| message.contains(k.as_str()))
    }
}

/// 故障转移策略
///
/// 调用入口处解析一次，整个调用期间只读共享。
#[derive(Clone)]
pub struct FailoverPolicy {
    max_retry: u32,
    only_once_per_node: bool,
    exception_policy: Arc<dyn ExceptionPolicy>,
    timeout_policy: Arc<dyn TimeoutPolicy>,
}

impl FailoverPolicy {
    pub fn new(
        max_retry: u32,
        only_once_per_node: bool,
        exception_policy: Arc<dyn ExceptionPolicy>,
        timeout_policy: Arc<dyn TimeoutPolicy>,
    ) -> Self {
        Self {
            max_retry,
            only_once_per_node,
            exception_policy,
            timeout_policy,
        }
    }

    pub fn with_max_retry(mut self, max_retry: u32) -> Self {
        self.max_retry = max_retry;
        self
    }

    pub fn with_only_once_per_node(mut self, only_once_per_node: bool) -> Self {
        self.only_once_per_node = only_once_per_node;
        self
    }

    pub fn with_exception_policy(mut self, policy: Arc<dyn ExceptionPolicy>) -> Self {
        self.exception_policy = policy;
        self
    }

    pub fn with_timeout_policy(mut self, policy: Arc<dyn TimeoutPolicy>) -> Self {
        self.timeout_policy = policy;
        self
    }

    /// 最大重试次数，总尝试次数不超过 max_retry + 1
    pub fn max_retry(&self) -> u32 {
        self.max_retry
    }

    /// 每个节点是否只允许尝试一次
    pub fn only_once_per_node(&self) -> bool {
        self.only_once_per_node
    }

    pub fn exception_policy(&self) -> &Arc<dyn ExceptionPolicy> {
        &self.exception_policy
    }

    pub fn timeout_policy(&self) -> &Arc<dyn TimeoutPolicy> {
        &self.timeout_policy
    }

    /// 错误是否可重试：自身标记可重试，或命中异常策略
    pub fn is_retryable(&self, err: &RpcError) -> bool {
        err.is_retry() || self.exception_policy.test(err)
    }
}

impl Default for FailoverPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_RETRY,
            false,
            Arc::new(ErrorKindPolicy::new(DEFAULT_RETRY_ERRORS.iter().copied())),
            Arc::new(RemainingTimeoutPolicy),
        )
    }
}

impl fmt::Debug for FailoverPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailoverPolicy")
            .field("max_retry", &self.max_retry)
            .field("only_once_per_node", &self.only_once_per_node)
            .field("timeout_policy", &self.timeout_policy.name())
            .finish()
    }
}
