//! 心跳应答
//!
//! 心跳协议层在保活交换中携带的健康状态

use serde::{Deserialize, Serialize};

/// 健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// 健康
    #[default]
    Healthy,
    /// 告警
    Warning,
    /// 死亡
    Dead,
}

impl HealthState {
    /// 是否仍可接收请求
    pub fn is_available(&self) -> bool {
        !matches!(self, HealthState::Dead)
    }
}

/// 心跳应答 Trait
pub trait HeartbeatResponse: Send + Sync {
    /// 获取健康状态
    fn health_state(&self) -> HealthState;
}

/// 默认心跳应答
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultHeartbeatResponse {
    #[serde(default)]
    health_state: HealthState,
}

impl DefaultHeartbeatResponse {
    pub fn new(health_state: HealthState) -> Self {
        Self { health_state }
    }
}

impl HeartbeatResponse for DefaultHeartbeatResponse {
    fn health_state(&self) -> HealthState {
        self.health_state
    }
}
