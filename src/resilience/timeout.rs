//! 超时策略实现
//!
//! 每次切换分组重试前，重置请求消息的剩余超时预算

use crate::protocol::RequestMessage;
use std::time::Duration;
use tokio::time::Instant;

/// 超时策略
pub trait TimeoutPolicy: Send + Sync {
    /// 重置请求的超时时间，在每次重试之前调用
    fn reset(&self, request: &mut RequestMessage);

    /// 策略名称
    fn name(&self) -> &str;
}

/// 预算耗尽后消息头保留的最小超时，零值表示未设置
pub const MIN_REMAINING_TIMEOUT: Duration = Duration::from_millis(1);

/// 剩余时间策略
///
/// 消息头超时扣减已耗时间，计时起点移到当前时刻，整个调用的总预算不变。
/// 已设置的超时最少保留 `MIN_REMAINING_TIMEOUT`，不会退化为未设置。
#[derive(Debug, Clone, Copy, Default)]
pub struct RemainingTimeoutPolicy;

impl TimeoutPolicy for RemainingTimeoutPolicy {
    fn reset(&self, request: &mut RequestMessage) {
        if !request.header().timeout.is_zero() {
            let remaining = request.remaining().max(MIN_REMAINING_TIMEOUT);
            request.header_mut().timeout = remaining;
        }
        request.set_created_at(Instant::now());
    }

    fn name(&self) -> &str {
        "remaining"
    }
}

/// 重置策略
///
/// 每次重试都恢复方法配置的完整超时时间。
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetTimeoutPolicy;

impl TimeoutPolicy for ResetTimeoutPolicy {
    fn reset(&self, request: &mut RequestMessage) {
        if let Some(timeout) = request.option().map(|option| option.timeout()) {
            request.header_mut().timeout = timeout;
        }
        request.set_created_at(Instant::now());
    }

    fn name(&self) -> &str {
        "reset"
    }
}
