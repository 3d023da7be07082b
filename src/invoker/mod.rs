//! 分组调用模块
//!
//! 管理分组引用的生命周期，并在分组之间执行故障转移重试
//!
//! # 调用流程
//!
//! ```text
//! invoke ─► 解析方法选项 ─► RetryState(attempt = 0)
//!              │
//!              ▼
//!     GroupSet[attempt % N].invoke ──► on_complete
//!              ▲                          │
//!              └──── Retry(attempt + 1) ◄─┤
//!                                         └─► Complete ─► CompletionFuture
//! ```

mod completion;
mod failover;
mod group;
mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use completion::{completion, CallOutcome, Completer, CompletionFuture};
pub use failover::{FailoverGroupInvoker, RetryState, Transition};
pub use group::{GroupInvokerBase, GroupSet, InvokerState};
pub use traits::{GroupInvoker, GroupReference, GroupReferenceFactory, ReferenceOptions};
