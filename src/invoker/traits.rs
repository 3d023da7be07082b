//! 分组调用层 Trait 定义
//!
//! 分组引用负责单个分组内的连接、序列化和负载均衡，
//! 分组调用器只负责选择分组和故障转移。

use super::completion::CompletionFuture;
use crate::error::RpcError;
use crate::protocol::{RequestMessage, RpcResult};
use crate::resilience::Route;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// 分组引用（单个分组的客户端桩）
#[async_trait]
pub trait GroupReference: Send + Sync {
    /// 分组别名
    fn alias(&self) -> &str;

    /// 建立到该分组的引用
    async fn refer(&self) -> Result<(), RpcError>;

    /// 发起一次调用
    ///
    /// 服务端异常既可以通过 `Err` 返回，也可以携带在 `RpcResult::Exception` 中。
    async fn invoke(&self, request: RequestMessage) -> Result<RpcResult, RpcError>;

    /// 关闭引用
    async fn close(&self, gracefully: bool) -> Result<(), RpcError>;
}

/// 创建分组引用时的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOptions {
    /// 服务接口名
    pub interface: String,
    /// 分组别名
    pub alias: String,
    /// 分组内的路由模式
    pub route: Route,
    /// 默认调用超时
    pub timeout: Duration,
}

/// 分组引用工厂
pub trait GroupReferenceFactory: Send + Sync {
    fn create(&self, options: &ReferenceOptions) -> Result<Arc<dyn GroupReference>, RpcError>;
}

impl<F> GroupReferenceFactory for F
where
    F: Fn(&ReferenceOptions) -> Result<Arc<dyn GroupReference>, RpcError> + Send + Sync,
{
    fn create(&self, options: &ReferenceOptions) -> Result<Arc<dyn GroupReference>, RpcError> {
        self(options)
    }
}

/// 分组调用器 Trait
///
/// 生命周期：`setup` → `refer` → `invoke`* → `close`
#[async_trait]
pub trait GroupInvoker: Send + Sync {
    /// 集群策略名称
    fn name(&self) -> &str;

    /// 初始化：校验分组配置并创建方法选项表
    fn setup(&self) -> Result<(), RpcError>;

    /// 并行建立所有分组引用，全部成功后才就绪
    async fn refer(&self) -> Result<(), RpcError>;

    /// 发起调用，立即返回，结果通过 `CompletionFuture` 异步完成
    ///
    /// 不在 tokio 运行时内调用时以 `RpcError::NotReady` 完成。
    fn invoke(&self, request: RequestMessage) -> CompletionFuture;

    /// 关闭调用器
    async fn close(&self, gracefully: bool) -> Result<(), RpcError>;
}
