//! 调用描述

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 一次方法调用的描述：目标接口、方法和参数
///
/// 按约定不可变。切换分组重试时需要重新构造一份，不同尝试之间不共享实例。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    class_name: String,
    method_name: String,
    #[serde(default)]
    args: Vec<Value>,
}

impl Invocation {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            args,
        }
    }

    /// 目标接口名
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// 方法名
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}
