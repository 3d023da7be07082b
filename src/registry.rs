//! 策略注册表
//!
//! 显式维护策略名称到构造函数的映射，在加载配置时解析

use crate::config::ConsumerConfig;
use crate::error::RpcError;
use crate::invoker::{FailoverGroupInvoker, GroupInvoker, GroupReferenceFactory};
use crate::resilience::{RemainingTimeoutPolicy, ResetTimeoutPolicy, TimeoutPolicy};
use std::collections::HashMap;
use std::sync::Arc;

/// 超时策略构造函数
pub type TimeoutPolicyConstructor = fn() -> Arc<dyn TimeoutPolicy>;

/// 分组调用器构造函数
pub type InvokerConstructor = fn(
    ConsumerConfig,
    Arc<dyn GroupReferenceFactory>,
    Arc<StrategyRegistry>,
) -> Arc<dyn GroupInvoker>;

/// 策略注册表
#[derive(Clone)]
pub struct StrategyRegistry {
    invokers: HashMap<String, InvokerConstructor>,
    timeout_policies: HashMap<String, TimeoutPolicyConstructor>,
}

fn failover_invoker(
    config: ConsumerConfig,
    factory: Arc<dyn GroupReferenceFactory>,
    registry: Arc<StrategyRegistry>,
) -> Arc<dyn GroupInvoker> {
    Arc::new(FailoverGroupInvoker::new(config, factory, registry))
}

fn remaining_policy() -> Arc<dyn TimeoutPolicy> {
    Arc::new(RemainingTimeoutPolicy)
}

fn reset_policy() -> Arc<dyn TimeoutPolicy> {
    Arc::new(ResetTimeoutPolicy)
}

impl StrategyRegistry {
    /// 创建空注册表
    pub fn empty() -> Self {
        Self {
            invokers: HashMap::new(),
            timeout_policies: HashMap::new(),
        }
    }

    /// 注册内置策略
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register_invoker("failover", failover_invoker);
        registry.register_timeout_policy("remaining", remaining_policy);
        registry.register_timeout_policy("reset", reset_policy);
        registry
    }

    pub fn register_invoker(&mut self, name: impl Into<String>, constructor: InvokerConstructor) {
        self.invokers.insert(name.into(), constructor);
    }

    pub fn register_timeout_policy(
        &mut self,
        name: impl Into<String>,
        constructor: TimeoutPolicyConstructor,
    ) {
        self.timeout_policies.insert(name.into(), constructor);
    }

    pub fn has_invoker(&self, name: &str) -> bool {
        self.invokers.contains_key(name)
    }

    /// 已注册的集群策略名称（排序）
    pub fn invoker_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.invokers.keys().cloned().collect();
        names.sort();
        names
    }

    /// 按名称创建超时策略
    pub fn timeout_policy(&self, name: &str) -> Result<Arc<dyn TimeoutPolicy>, RpcError> {
        self.timeout_policies
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| RpcError::Config(format!("未知的超时策略: {}", name)))
    }

    /// 校验消费者配置中引用的策略名称
    pub fn validate(&self, config: &ConsumerConfig) -> Result<(), RpcError> {
        config.validate().map_err(RpcError::Config)?;
        if !self.has_invoker(&config.cluster) {
            return Err(RpcError::Config(format!(
                "未知的集群策略: {}",
                config.cluster
            )));
        }
        self.timeout_policy(&config.failover.timeout_policy)?;
        for method in config.methods.values() {
            if let Some(name) = &method.timeout_policy {
                self.timeout_policy(name)?;
            }
        }
        Ok(())
    }

    /// 按配置中的集群策略创建分组调用器
    pub fn create_invoker(
        self: &Arc<Self>,
        config: ConsumerConfig,
        factory: Arc<dyn GroupReferenceFactory>,
    ) -> Result<Arc<dyn GroupInvoker>, RpcError> {
        self.validate(&config)?;
        let constructor = self
            .invokers
            .get(&config.cluster)
            .copied()
            .ok_or_else(|| RpcError::Config(format!("未知的集群策略: {}", config.cluster)))?;
        Ok(constructor(config, factory, Arc::clone(self)))
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut policies: Vec<&String> = self.timeout_policies.keys().collect();
        policies.sort();
        f.debug_struct("StrategyRegistry")
            .field("invokers", &self.invoker_names())
            .field("timeout_policies", &policies)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::mock::MockCluster;

    #[test]
    fn test_registry_defaults() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(registry.invoker_names(), vec!["failover".to_string()]);
        assert_eq!(registry.timeout_policy("remaining").unwrap().name(), "remaining");
        assert_eq!(registry.timeout_policy("reset").unwrap().name(), "reset");
    }

    #[test]
    fn test_registry_unknown_timeout_policy() {
        let registry = StrategyRegistry::with_defaults();
        assert!(matches!(
            registry.timeout_policy("forever"),
            Err(RpcError::Config(_))
        ));
    }

    #[test]
    fn test_registry_rejects_unknown_cluster() {
        let registry = Arc::new(StrategyRegistry::with_defaults());
        let mut config = ConsumerConfig::new("Echo", vec!["a".to_string()]);
        config.cluster = "broadcast".to_string();

        let cluster = MockCluster::new();
        let result = registry.create_invoker(config, cluster.factory());
        assert!(matches!(result, Err(RpcError::Config(msg)) if msg.contains("broadcast")));
    }

    #[test]
    fn test_registry_rejects_unknown_method_timeout_policy() {
        let registry = StrategyRegistry::with_defaults();
        let mut config = ConsumerConfig::new("Echo", vec!["a".to_string()]);
        config.methods.insert(
            "echo".to_string(),
            crate::config::MethodConfig {
                timeout_policy: Some("forever".to_string()),
                ..Default::default()
            },
        );
        assert!(registry.validate(&config).is_err());
    }

    #[test]
    fn test_registry_creates_failover_invoker() {
        let registry = Arc::new(StrategyRegistry::with_defaults());
        let config = ConsumerConfig::new("Echo", vec!["a".to_string(), "b".to_string()]);

        let cluster = MockCluster::new();
        let invoker = registry.create_invoker(config, cluster.factory()).unwrap();
        assert_eq!(invoker.name(), "failover");
    }

    #[test]
    fn test_registry_custom_timeout_policy() {
        let mut registry = StrategyRegistry::empty();
        assert!(registry.timeout_policy("remaining").is_err());

        registry.register_timeout_policy("remaining", remaining_policy);
        assert!(registry.timeout_policy("remaining").is_ok());
        assert!(!registry.has_invoker("failover"));
    }
}
