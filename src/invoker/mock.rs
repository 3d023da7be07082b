//! 测试用的脚本化分组引用

use super::traits::{GroupReference, GroupReferenceFactory, ReferenceOptions};
use crate::error::RpcError;
use crate::protocol::{Invocation, RequestMessage, RpcResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// 应答函数，参数为集群内的全局调用序号和请求
pub(crate) type Responder =
    Arc<dyn Fn(usize, &RequestMessage) -> Result<RpcResult, RpcError> + Send + Sync>;

/// 一次调用记录
#[derive(Debug, Clone)]
pub(crate) struct CallRecord {
    pub alias: String,
    pub payload: Arc<Invocation>,
    pub timeout: Duration,
}

struct ClusterInner {
    default_responder: Mutex<Responder>,
    responders: Mutex<HashMap<String, Responder>>,
    delays: Mutex<HashMap<String, Duration>>,
    refer_failures: Mutex<HashMap<String, RpcError>>,
    create_failures: Mutex<HashMap<String, RpcError>>,
    calls: Mutex<Vec<CallRecord>>,
    created: Mutex<Vec<ReferenceOptions>>,
    referred: Mutex<Vec<String>>,
    closed: Mutex<Vec<String>>,
}

/// 一组可脚本化的分组引用
#[derive(Clone)]
pub(crate) struct MockCluster {
    inner: Arc<ClusterInner>,
}

impl MockCluster {
    /// 默认所有调用都成功返回 "ok"
    pub fn new() -> Self {
        let default_responder: Responder = Arc::new(|_, _| Ok(RpcResult::success(json!("ok"))));
        Self {
            inner: Arc::new(ClusterInner {
                default_responder: Mutex::new(default_responder),
                responders: Mutex::new(HashMap::new()),
                delays: Mutex::new(HashMap::new()),
                refer_failures: Mutex::new(HashMap::new()),
                create_failures: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
                created: Mutex::new(Vec::new()),
                referred: Mutex::new(Vec::new()),
                closed: Mutex::new(Vec::new()),
            }),
        }
    }

    /// 所有分组使用同一个应答函数
    pub fn respond_all<F>(&self, responder: F) -> &Self
    where
        F: Fn(usize, &RequestMessage) -> Result<RpcResult, RpcError> + Send + Sync + 'static,
    {
        *self.inner.default_responder.lock() = Arc::new(responder);
        self
    }

    /// 所有调用都返回同一个错误
    pub fn fail_all(&self, err: RpcError) -> &Self {
        self.respond_all(move |_, _| Err(err.clone()))
    }

    /// 为指定分组设置应答函数
    pub fn respond<F>(&self, alias: &str, responder: F) -> &Self
    where
        F: Fn(usize, &RequestMessage) -> Result<RpcResult, RpcError> + Send + Sync + 'static,
    {
        self.inner
            .responders
            .lock()
            .insert(alias.to_string(), Arc::new(responder));
        self
    }

    /// 指定分组的每次调用延迟返回
    pub fn delay(&self, alias: &str, delay: Duration) -> &Self {
        self.inner.delays.lock().insert(alias.to_string(), delay);
        self
    }

    /// 指定分组引用失败
    pub fn fail_refer(&self, alias: &str, err: RpcError) -> &Self {
        self.inner
            .refer_failures
            .lock()
            .insert(alias.to_string(), err);
        self
    }

    /// 工厂为指定分组创建引用时失败
    pub fn fail_create(&self, alias: &str, err: RpcError) -> &Self {
        self.inner
            .create_failures
            .lock()
            .insert(alias.to_string(), err);
        self
    }

    pub fn factory(&self) -> Arc<dyn GroupReferenceFactory> {
        let inner = Arc::clone(&self.inner);
        let factory = move |options: &ReferenceOptions| -> Result<Arc<dyn GroupReference>, RpcError> {
            if let Some(err) = inner.create_failures.lock().get(&options.alias).cloned() {
                return Err(err);
            }
            inner.created.lock().push(options.clone());
            Ok(Arc::new(MockGroup {
                alias: options.alias.clone(),
                cluster: Arc::clone(&inner),
            }))
        };
        Arc::new(factory)
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.inner.calls.lock().clone()
    }

    pub fn call_aliases(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.alias).collect()
    }

    pub fn created(&self) -> Vec<ReferenceOptions> {
        self.inner.created.lock().clone()
    }

    pub fn referred(&self) -> Vec<String> {
        self.inner.referred.lock().clone()
    }

    pub fn closed(&self) -> Vec<String> {
        self.inner.closed.lock().clone()
    }
}

struct MockGroup {
    alias: String,
    cluster: Arc<ClusterInner>,
}

#[async_trait]
impl GroupReference for MockGroup {
    fn alias(&self) -> &str {
        &self.alias
    }

    async fn refer(&self) -> Result<(), RpcError> {
        let failure = self.cluster.refer_failures.lock().get(&self.alias).cloned();
        match failure {
            Some(err) => Err(err),
            None => {
                self.cluster.referred.lock().push(self.alias.clone());
                Ok(())
            }
        }
    }

    async fn invoke(&self, request: RequestMessage) -> Result<RpcResult, RpcError> {
        let index = {
            let mut calls = self.cluster.calls.lock();
            calls.push(CallRecord {
                alias: self.alias.clone(),
                payload: Arc::clone(request.payload()),
                timeout: request.header().timeout,
            });
            calls.len() - 1
        };

        let delay = self.cluster.delays.lock().get(&self.alias).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let responder = self
            .cluster
            .responders
            .lock()
            .get(&self.alias)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.cluster.default_responder.lock()));
        responder(index, &request)
    }

    async fn close(&self, _gracefully: bool) -> Result<(), RpcError> {
        self.cluster.closed.lock().push(self.alias.clone());
        Ok(())
    }
}
