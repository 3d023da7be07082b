//! 故障转移分组调用器
//!
//! 调用失败后按位置切换到下一个分组重试，直到成功、重试耗尽或遇到不可重试的错误

use super::completion::{completion, CallOutcome, Completer, CompletionFuture};
use super::group::{GroupInvokerBase, GroupSet, InvokerState};
use super::traits::{GroupInvoker, GroupReference, GroupReferenceFactory};
use crate::config::ConsumerConfig;
use crate::error::{FailureFactory, RpcError};
use crate::option::{InterfaceOption, OptionResolver};
use crate::protocol::{Invocation, RequestMessage, RpcResult};
use crate::registry::StrategyRegistry;
use crate::resilience::{FailoverPolicy, Route};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// 状态机在一次尝试完成后的决定
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// 终止调用
    Complete(CallOutcome),
    /// 切换分组重试，携带本次失败原因
    Retry(RpcError),
}

/// 单次逻辑调用的重试状态
///
/// 每次尝试完成后由 `on_complete` 决定下一步，不依赖具体的分组实现。
pub struct RetryState {
    attempt: u32,
    request: RequestMessage,
    policy: Arc<FailoverPolicy>,
    group_count: usize,
    failures: FailureFactory,
}

impl RetryState {
    pub fn new(
        request: RequestMessage,
        policy: Arc<FailoverPolicy>,
        group_count: usize,
        failures: FailureFactory,
    ) -> Self {
        Self {
            attempt: 0,
            request,
            policy,
            group_count,
            failures,
        }
    }

    /// 当前尝试序号，从 0 开始
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn request(&self) -> &RequestMessage {
        &self.request
    }

    pub fn policy(&self) -> &Arc<FailoverPolicy> {
        &self.policy
    }

    /// 本次尝试使用的分组
    pub fn select<'a>(&self, groups: &'a GroupSet) -> &'a Arc<dyn GroupReference> {
        groups.select(self.attempt)
    }

    /// 根据本次尝试的结果决定终止还是重试
    pub fn on_complete(&mut self, outcome: CallOutcome) -> Transition {
        let err = match outcome {
            Ok(RpcResult::Exception(err)) | Err(err) => err,
            Ok(result) => return Transition::Complete(Ok(result)),
        };

        if self.request.is_timeout() {
            // 预算已经耗尽，再重试也无法在超时内完成
            return Transition::Complete(Err(err));
        }
        if !self.policy.is_retryable(&err) {
            return Transition::Complete(Err(err));
        }
        if self.attempt >= self.policy.max_retry() {
            return Transition::Complete(Err((self.failures.overload)(self.policy.max_retry())));
        }
        if self.group_count == 1 && self.policy.only_once_per_node() {
            return Transition::Complete(Err((self.failures.empty)(self.attempt, false)));
        }

        self.policy.timeout_policy().reset(&mut self.request);
        // 不同分组可能需要不同的参数，切换分组时重新生成一份调用描述
        let current = Arc::clone(self.request.payload());
        self.request.set_payload(Invocation::new(
            current.class_name(),
            current.method_name(),
            current.args().to_vec(),
        ));
        self.attempt += 1;
        Transition::Retry(err)
    }
}

/// 驱动一次逻辑调用，直到状态机给出终止决定
///
/// 同一调用的尝试严格串行，每次只有一个在途请求。
async fn drive(groups: Arc<GroupSet>, mut state: RetryState, completer: Completer) {
    loop {
        let group = Arc::clone(state.select(&groups));
        tracing::debug!(
            msg_id = %state.request().msg_id(),
            alias = %group.alias(),
            attempt = state.attempt(),
            "[FAILOVER] 调用分组"
        );

        let outcome = group.invoke(state.request().clone()).await;
        match state.on_complete(outcome) {
            Transition::Complete(outcome) => {
                if let Err(e) = &outcome {
                    tracing::debug!(
                        msg_id = %state.request().msg_id(),
                        attempt = state.attempt(),
                        "[FAILOVER] 调用失败: {}",
                        e
                    );
                }
                completer.complete(outcome);
                return;
            }
            Transition::Retry(cause) => {
                tracing::warn!(
                    msg_id = %state.request().msg_id(),
                    alias = %group.alias(),
                    next_attempt = state.attempt(),
                    "[FAILOVER] 分组 {} 调用失败，切换重试: {}",
                    group.alias(),
                    cause
                );
            }
        }
    }
}

/// 故障转移分组调用器
pub struct FailoverGroupInvoker {
    base: GroupInvokerBase,
    registry: Arc<StrategyRegistry>,
    options: RwLock<Option<Arc<dyn OptionResolver>>>,
    failures: FailureFactory,
}

impl FailoverGroupInvoker {
    pub fn new(
        config: ConsumerConfig,
        factory: Arc<dyn GroupReferenceFactory>,
        registry: Arc<StrategyRegistry>,
    ) -> Self {
        Self {
            base: GroupInvokerBase::new(config, factory),
            registry,
            options: RwLock::new(None),
            failures: FailureFactory::default(),
        }
    }

    /// 使用外部提供的方法选项，`setup` 时不再根据配置创建
    pub fn with_option_resolver(self, resolver: Arc<dyn OptionResolver>) -> Self {
        *self.options.write() = Some(resolver);
        self
    }

    /// 替换合成错误的构造函数
    pub fn with_failure_factory(mut self, failures: FailureFactory) -> Self {
        self.failures = failures;
        self
    }

    pub fn base(&self) -> &GroupInvokerBase {
        &self.base
    }

    pub fn is_ready(&self) -> bool {
        self.base.is_ready()
    }

    pub fn group(&self, alias: &str) -> Option<Arc<dyn GroupReference>> {
        self.base.group(alias)
    }

    pub fn aliases(&self) -> Vec<String> {
        self.base.aliases()
    }

    pub fn group_count(&self) -> usize {
        self.base.group_count()
    }

    fn resolver(&self) -> Option<Arc<dyn OptionResolver>> {
        self.options.read().clone()
    }
}

#[async_trait]
impl GroupInvoker for FailoverGroupInvoker {
    fn name(&self) -> &str {
        "failover"
    }

    fn setup(&self) -> Result<(), RpcError> {
        self.base.setup()?;
        // 不支持动态别名
        if self.base.alias_adaptive() {
            tracing::warn!(
                "[FAILOVER] 接口 {} 不支持动态分组，已关闭 alias_adaptive",
                self.base.config().interface
            );
        }
        self.base.set_alias_adaptive(false);

        let mut options = self.options.write();
        if options.is_none() {
            let option = InterfaceOption::new(self.base.config(), &self.registry)?;
            *options = Some(Arc::new(option));
        }
        Ok(())
    }

    async fn refer(&self) -> Result<(), RpcError> {
        // 单个分组内不重试，避免重复消耗故障转移的次数
        self.base.refer_all(Route::FailFast).await.map(|_| ())
    }

    fn invoke(&self, mut request: RequestMessage) -> CompletionFuture {
        let groups = match self.base.state() {
            InvokerState::Ready => self.base.groups(),
            InvokerState::Closed => return CompletionFuture::completed(Err(RpcError::Closed)),
            InvokerState::Created | InvokerState::SetUp => None,
        };
        let (groups, resolver) = match (groups, self.resolver()) {
            (Some(groups), Some(resolver)) => (groups, resolver),
            _ => {
                return CompletionFuture::completed(Err(RpcError::NotReady(format!(
                    "接口 {} 分组引用尚未完成",
                    self.base.config().interface
                ))))
            }
        };

        // 没有运行时无法驱动重试
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                return CompletionFuture::completed(Err(RpcError::NotReady(format!(
                    "当前线程没有 tokio 运行时: {}",
                    e
                ))))
            }
        };

        let option = resolver.get_option(request.payload().method_name());
        request.header_mut().timeout = option.timeout();
        let policy = Arc::clone(option.failover_policy());
        request.set_option(option);

        let (completer, future) = completion();
        let state = RetryState::new(request, policy, groups.len(), self.failures);
        runtime.spawn(drive(groups, state, completer));
        future
    }

    async fn close(&self, gracefully: bool) -> Result<(), RpcError> {
        let options = self.options.write().take();
        if let Some(options) = options {
            options.close();
        }
        self.base.close(gracefully).await
    }
}
