//! 通知分发引擎
//!
//! 把邮件、短信、推送、即时通讯四类通知路由到对应渠道，
//! 渲染模板并把各服务商的响应归一化为统一的发送结果。
//!
//! ## 模块结构
//!
//! - `types`: 通知数据模型与发送结果
//! - `template`: `{{variable}}` 模板渲染
//! - `gateway`: 渠道网关契约与渠道消息
//! - `handlers`: 各渠道处理器
//! - `registry`: 按通知类型索引的 Handler 注册表
//! - `pool`: 有界工作池
//! - `dispatcher`: 同步、异步、批量发送入口

pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod pool;
pub mod registry;
pub mod template;
pub mod types;

mod validation;

pub use dispatcher::{BatchHandle, NotificationDispatcher, SendHandle};
pub use error::{NotificationError, Result};
pub use gateway::{
    ChatGateway, ChatMessage, EmailGateway, EmailMessage, GatewayFault, GatewayOutcome,
    PushGateway, PushMessage, SmsGateway, SmsMessage,
};
pub use handlers::{ChatHandler, EmailHandler, NotificationHandler, PushHandler, SmsHandler};
pub use pool::{TaskHandle, WorkerPool};
pub use registry::HandlerRegistry;
pub use template::{PlaceholderRenderer, TemplateRenderer};
pub use types::{
    ChatNotification, EmailNotification, Notification, NotificationKind, NotificationResult,
    PushNotification, SmsNotification, Variables,
};
