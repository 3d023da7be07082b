//! 请求消息
//!
//! 包装调用描述，并在消息头中携带剩余超时时间

use super::Invocation;
use crate::option::MethodOption;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// 消息头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// 消息 ID，用于日志关联
    pub msg_id: Uuid,
    /// 超时时间，零表示尚未设置
    pub timeout: Duration,
}

impl Header {
    pub fn new(timeout: Duration) -> Self {
        Self {
            msg_id: Uuid::new_v4(),
            timeout,
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

/// 请求消息
///
/// 克隆代价很低：负载和方法选项都是共享指针。
#[derive(Debug, Clone)]
pub struct RequestMessage {
    header: Header,
    payload: Arc<Invocation>,
    option: Option<Arc<MethodOption>>,
    created_at: Instant,
}

impl RequestMessage {
    pub fn new(invocation: Invocation) -> Self {
        Self {
            header: Header::default(),
            payload: Arc::new(invocation),
            option: None,
            created_at: Instant::now(),
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn msg_id(&self) -> Uuid {
        self.header.msg_id
    }

    pub fn payload(&self) -> &Arc<Invocation> {
        &self.payload
    }

    pub fn set_payload(&mut self, payload: Invocation) {
        self.payload = Arc::new(payload);
    }

    /// 方法选项，调用入口处解析一次
    pub fn option(&self) -> Option<&Arc<MethodOption>> {
        self.option.as_ref()
    }

    pub fn set_option(&mut self, option: Arc<MethodOption>) {
        self.option = Some(option);
    }

    /// 计时起点
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: Instant) {
        self.created_at = created_at;
    }

    /// 自计时起点以来的耗时
    pub fn elapsed(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// 剩余超时时间
    pub fn remaining(&self) -> Duration {
        self.header.timeout.saturating_sub(self.elapsed())
    }

    /// 耗时是否已经达到消息头中的超时时间
    ///
    /// 边界包含在内：耗时恰好等于超时即视为超时。零超时表示未设置，永不超时。
    pub fn is_timeout(&self) -> bool {
        !self.header.timeout.is_zero() && self.elapsed() >= self.header.timeout
    }
}
