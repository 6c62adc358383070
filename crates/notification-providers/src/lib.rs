//! 模拟服务商网关
//!
//! 为每个渠道提供一个或多个服务商实现（SendGrid、Mailgun、Twilio、Firebase、Slack）。
//! 当前均为模拟发送：按服务商的请求/响应模型组装报文并记录日志，不发起网络请求。
//! 接入真实 SDK 时只需替换各自的 `simulated_send`。

pub mod config;
pub mod error;
pub mod firebase;
pub mod mailgun;
pub mod sendgrid;
pub mod slack;
pub mod twilio;

pub use config::ValidateProviderConfig;
pub use error::ProviderError;
pub use firebase::FirebasePushGateway;
pub use mailgun::MailgunEmailGateway;
pub use sendgrid::SendGridEmailGateway;
pub use slack::SlackChatGateway;
pub use twilio::TwilioSmsGateway;
