//! 协议消息模块
//!
//! 提供调用描述、请求消息、调用结果和心跳应答

mod heartbeat;
mod invocation;
mod message;
mod result;

pub use heartbeat::{DefaultHeartbeatResponse, HealthState, HeartbeatResponse};
pub use invocation::Invocation;
pub use message::{Header, RequestMessage};
pub use result::RpcResult;
