//! 方法选项

use crate::resilience::FailoverPolicy;
use std::sync::Arc;
use std::time::Duration;

/// 方法选项
///
/// 调用入口处解析一次，整个调用期间不变，所有重试共享。
#[derive(Debug, Clone)]
pub struct MethodOption {
    method_name: String,
    timeout: Duration,
    failover_policy: Arc<FailoverPolicy>,
}

impl MethodOption {
    pub fn new(
        method_name: impl Into<String>,
        timeout: Duration,
        failover_policy: Arc<FailoverPolicy>,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            timeout,
            failover_policy,
        }
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// 调用超时
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn failover_policy(&self) -> &Arc<FailoverPolicy> {
        &self.failover_policy
    }

    /// 以当前选项为模板生成另一个方法的选项
    pub fn for_method(&self, method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            timeout: self.timeout,
            failover_policy: Arc::clone(&self.failover_policy),
        }
    }
}

/// 方法选项解析器
pub trait OptionResolver: Send + Sync {
    /// 获取方法选项，未单独配置的方法使用接口默认值
    fn get_option(&self, method_name: &str) -> Arc<MethodOption>;

    /// 释放选项表
    fn close(&self) {}
}
