//! RPC 客户端分组故障转移
//!
//! 将同一服务接口的多个独立寻址分组组合成一个逻辑调用方，
//! 调用失败时按位置切换到下一个分组重试。
//!
//! ```no_run
//! use rpc_cluster::{
//!     config::ConsumerConfig, GroupInvoker, GroupReferenceFactory, Invocation, RequestMessage,
//!     StrategyRegistry,
//! };
//! use std::sync::Arc;
//!
//! # async fn run(factory: Arc<dyn GroupReferenceFactory>) -> Result<(), rpc_cluster::RpcError> {
//! let registry = Arc::new(StrategyRegistry::with_defaults());
//! let config = ConsumerConfig::new("com.example.Echo", vec!["east".into(), "west".into()]);
//! let invoker = registry.create_invoker(config, factory)?;
//! invoker.setup()?;
//! invoker.refer().await?;
//!
//! let request = RequestMessage::new(Invocation::new("com.example.Echo", "echo", vec![]));
//! let result = invoker.invoke(request).await?;
//! println!("{:?}", result.value());
//! invoker.close(true).await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod invoker;
pub mod logger;
pub mod option;
pub mod protocol;
pub mod registry;
pub mod resilience;

pub use error::{ErrorKind, FailureFactory, RpcError};
pub use invoker::{
    CompletionFuture, FailoverGroupInvoker, GroupInvoker, GroupReference, GroupReferenceFactory,
    ReferenceOptions,
};
pub use option::{InterfaceOption, MethodOption, OptionResolver};
pub use protocol::{Invocation, RequestMessage, RpcResult};
pub use registry::StrategyRegistry;
pub use resilience::{FailoverPolicy, Route, TimeoutPolicy};
