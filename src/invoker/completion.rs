//! 调用完成信号
//!
//! 单次赋值的异步结果容器

use crate::error::RpcError;
use crate::protocol::RpcResult;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// 一次逻辑调用的最终结果
pub type CallOutcome = Result<RpcResult, RpcError>;

/// 创建一对完成器和完成信号
pub fn completion() -> (Completer, CompletionFuture) {
    let (tx, rx) = oneshot::channel();
    (
        Completer {
            tx: Mutex::new(Some(tx)),
        },
        CompletionFuture { rx },
    )
}

/// 完成器，只有第一次 `complete` 生效
#[derive(Debug)]
pub struct Completer {
    tx: Mutex<Option<oneshot::Sender<CallOutcome>>>,
}

impl Completer {
    /// 完成调用，返回本次是否生效
    ///
    /// 已经完成过时为空操作并返回 `false`。
    pub fn complete(&self, outcome: CallOutcome) -> bool {
        match self.tx.lock().take() {
            // 接收端已丢弃时调用方不再关心结果，仍视为完成
            Some(tx) => {
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.tx.lock().is_none()
    }
}

/// 暴露给调用方的完成信号
///
/// 完成器未完成就被丢弃时，返回 `RpcError::Cancelled`。
#[derive(Debug)]
pub struct CompletionFuture {
    rx: oneshot::Receiver<CallOutcome>,
}

impl CompletionFuture {
    /// 创建一个已经完成的信号
    pub fn completed(outcome: CallOutcome) -> Self {
        let (completer, future) = completion();
        completer.complete(outcome);
        future
    }
}

impl Future for CompletionFuture {
    type Output = CallOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(RpcError::Cancelled)))
    }
}
