//! 渠道网关契约
//!
//! 每种渠道一个网关 trait，负责把渲染好的渠道消息交给服务商，
//! 并把服务商的响应归一化为 [`GatewayOutcome`]。
//!
//! 网关调用是阻塞的：同步发送在调用方线程执行，异步发送由工作池放到阻塞线程上执行。
//! 网关本身连接不上服务商等基础设施问题返回 `Err`，服务商拒收则通过 `error` 字段表达。

use std::collections::HashMap;

use crate::error::Result;

/// 渲染后的邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// 渲染后的短信
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub from: String,
    pub to: String,
    pub body: String,
}

/// 渲染后的推送
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

/// 渲染后的即时通讯消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// 频道、群聊或房间标识
    pub destination: String,
    pub text: String,
}

/// 服务商返回的错误内容
///
/// 有的服务商返回单条错误描述，有的返回错误列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayFault {
    Message(String),
    Messages(Vec<String>),
}

impl GatewayFault {
    /// 错误内容，列表项以 `"; "` 连接
    ///
    /// 只有空字符串和空列表返回 None；空白字符串或含空白项的列表仍是错误
    pub fn describe(&self) -> Option<String> {
        match self {
            Self::Message(message) => (!message.is_empty()).then(|| message.clone()),
            Self::Messages(messages) => (!messages.is_empty()).then(|| messages.join("; ")),
        }
    }
}

impl From<String> for GatewayFault {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for GatewayFault {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<Vec<String>> for GatewayFault {
    fn from(value: Vec<String>) -> Self {
        Self::Messages(value)
    }
}

/// 网关调用结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOutcome {
    /// 服务商分配的投递 ID
    pub delivery_id: Option<String>,
    /// 服务商原始状态，如 "accepted"、"queued"
    pub status: String,
    pub error: Option<GatewayFault>,
}

impl GatewayOutcome {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            delivery_id: None,
            status: status.into(),
            error: None,
        }
    }

    pub fn with_delivery_id(mut self, delivery_id: impl Into<String>) -> Self {
        self.delivery_id = Some(delivery_id.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<GatewayFault>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// 服务商拒收原因，None 表示投递成功
    pub fn failure_reason(&self) -> Option<String> {
        self.error.as_ref().and_then(GatewayFault::describe)
    }
}

/// 邮件网关
#[cfg_attr(test, mockall::automock)]
pub trait EmailGateway: Send + Sync {
    fn send(&self, message: EmailMessage) -> Result<GatewayOutcome>;
}

/// 短信网关
///
/// 部分短信服务商在受理后不返回任何响应体，此时返回 `Ok(None)`，按成功处理
#[cfg_attr(test, mockall::automock)]
pub trait SmsGateway: Send + Sync {
    fn send(&self, message: SmsMessage) -> Result<Option<GatewayOutcome>>;
}

/// 推送网关
#[cfg_attr(test, mockall::automock)]
pub trait PushGateway: Send + Sync {
    fn send(&self, message: PushMessage) -> Result<GatewayOutcome>;
}

/// 即时通讯网关
#[cfg_attr(test, mockall::automock)]
pub trait ChatGateway: Send + Sync {
    fn send(&self, message: ChatMessage) -> Result<GatewayOutcome>;
}
