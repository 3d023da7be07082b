//! 容错机制模块
//!
//! 提供故障转移策略、异常分类和超时预算控制

mod failover;
mod timeout;

pub use failover::{
    ErrorKindPolicy, ExceptionPolicy, FailoverPolicy, Route, DEFAULT_MAX_RETRY,
    DEFAULT_RETRY_ERRORS,
};
pub use timeout::{
    RemainingTimeoutPolicy, ResetTimeoutPolicy, TimeoutPolicy, MIN_REMAINING_TIMEOUT,
};
