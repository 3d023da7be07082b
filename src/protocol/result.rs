//! 调用结果

use crate::error::RpcError;
use serde_json::Value;

/// 单次尝试的最终结果：要么是返回值，要么携带失败原因
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResult {
    /// 调用成功
    Value(Value),
    /// 服务端返回的异常
    Exception(RpcError),
}

impl RpcResult {
    pub fn success(value: Value) -> Self {
        RpcResult::Value(value)
    }

    pub fn exception(err: RpcError) -> Self {
        RpcResult::Exception(err)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RpcResult::Value(_))
    }

    /// 获取携带的异常（如果有）
    pub fn get_exception(&self) -> Option<&RpcError> {
        match self {
            RpcResult::Exception(err) => Some(err),
            RpcResult::Value(_) => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            RpcResult::Value(value) => Some(value),
            RpcResult::Exception(_) => None,
        }
    }

    /// 转换为标准 Result
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self {
            RpcResult::Value(value) => Ok(value),
            RpcResult::Exception(err) => Err(err),
        }
    }
}
