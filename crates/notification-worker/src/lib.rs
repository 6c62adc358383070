//! 通知工作者服务
//!
//! 按配置装配服务商网关、渠道处理器和分发器，并提供一个覆盖全部发送方式的演示流程。

pub mod demo;
pub mod error;
pub mod wiring;

pub use error::WorkerError;
pub use wiring::{build_dispatcher, build_registry};
