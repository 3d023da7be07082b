//! 接口方法选项表

use super::method::{MethodOption, OptionResolver};
use crate::config::{ConsumerConfig, FailoverConfig};
use crate::error::RpcError;
use crate::registry::StrategyRegistry;
use crate::resilience::{ErrorKindPolicy, FailoverPolicy};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// 接口方法选项表
///
/// 单独配置的方法在创建时解析，其它方法首次调用时按接口默认值生成并缓存。
pub struct InterfaceOption {
    interface: String,
    default: Arc<MethodOption>,
    methods: RwLock<HashMap<String, Arc<MethodOption>>>,
}

impl InterfaceOption {
    /// 根据消费者配置创建，未知的超时策略名称在此处报错
    pub fn new(config: &ConsumerConfig, registry: &StrategyRegistry) -> Result<Self, RpcError> {
        let default = Arc::new(build_option(
            "*",
            config.timeout_ms,
            &config.failover,
            registry,
        )?);

        let mut methods = HashMap::with_capacity(config.methods.len());
        for name in config.methods.keys() {
            let (timeout_ms, failover) = config.resolve_method(name);
            let option = build_option(name, timeout_ms, &failover, registry)?;
            methods.insert(name.clone(), Arc::new(option));
        }

        tracing::debug!(
            "[OPTION] 接口 {} 解析方法选项: {} 个方法单独配置",
            config.interface,
            methods.len()
        );

        Ok(Self {
            interface: config.interface.clone(),
            default,
            methods: RwLock::new(methods),
        })
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// 已缓存的方法选项数量
    pub fn len(&self) -> usize {
        self.methods.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.read().is_empty()
    }
}

impl OptionResolver for InterfaceOption {
    fn get_option(&self, method_name: &str) -> Arc<MethodOption> {
        if let Some(option) = self.methods.read().get(method_name) {
            return Arc::clone(option);
        }
        let mut methods = self.methods.write();
        Arc::clone(
            methods
                .entry(method_name.to_string())
                .or_insert_with(|| Arc::new(self.default.for_method(method_name))),
        )
    }

    fn close(&self) {
        self.methods.write().clear();
        tracing::debug!("[OPTION] 接口 {} 方法选项已释放", self.interface);
    }
}

fn build_option(
    method_name: &str,
    timeout_ms: u64,
    failover: &FailoverConfig,
    registry: &StrategyRegistry,
) -> Result<MethodOption, RpcError> {
    let exception_policy = ErrorKindPolicy::new(failover.retry_errors.iter().copied())
        .with_keywords(&failover.retry_keywords);
    let timeout_policy = registry.timeout_policy(&failover.timeout_policy)?;
    let policy = FailoverPolicy::new(
        failover.max_retry,
        failover.only_once_per_node,
        Arc::new(exception_policy),
        timeout_policy,
    );
    Ok(MethodOption::new(
        method_name,
        Duration::from_millis(timeout_ms),
        Arc::new(policy),
    ))
}
