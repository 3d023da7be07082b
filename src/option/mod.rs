//! 方法选项模块
//!
//! 按方法名解析调用超时和故障转移策略

mod interface;
mod method;

pub use interface::InterfaceOption;
pub use method::{MethodOption, OptionResolver};
