//! 通知数据模型
//!
//! 定义四类通知（邮件、短信、推送、即时通讯）、通知类型标签和统一的发送结果。
//! 通知一经构造即不可变，所有校验都在构造函数中完成。

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::validation::{require_email, require_non_blank, require_phone};

/// 模板变量：变量名 -> 值
pub type Variables = HashMap<String, Value>;

/// 通知类型标签
///
/// 注册表以此为 key 把通知路由到对应渠道的 Handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Email,
    Sms,
    Push,
    Chat,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
            Self::Push => "PUSH",
            Self::Chat => "CHAT",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// 邮件
// ---------------------------------------------------------------------------

/// 邮件通知
#[derive(Debug, Clone, PartialEq)]
pub struct EmailNotification {
    sender: String,
    recipient: String,
    subject_template: String,
    body_template: String,
    variables: Variables,
}

impl EmailNotification {
    /// 创建邮件通知
    ///
    /// 发件人与收件人必须是合法邮箱地址，主题和正文模板不能为空
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        subject_template: impl Into<String>,
        body_template: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            sender: require_email("sender", sender.into())?,
            recipient: require_email("recipient", recipient.into())?,
            subject_template: require_non_blank("subject_template", subject_template.into())?,
            body_template: require_non_blank("body_template", body_template.into())?,
            variables: Variables::new(),
        })
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables.extend(variables);
        self
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn subject_template(&self) -> &str {
        &self.subject_template
    }

    pub fn body_template(&self) -> &str {
        &self.body_template
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }
}

// ---------------------------------------------------------------------------
// 短信
// ---------------------------------------------------------------------------

/// 短信通知
#[derive(Debug, Clone, PartialEq)]
pub struct SmsNotification {
    sender: String,
    recipient: String,
    message_template: String,
    variables: Variables,
}

impl SmsNotification {
    /// 创建短信通知
    ///
    /// 发送方与接收方都必须是手机号（可带 `+` 前缀，8 到 15 位数字）
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        message_template: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            sender: require_phone("sender", sender.into())?,
            recipient: require_phone("recipient", recipient.into())?,
            message_template: require_non_blank("message_template", message_template.into())?,
            variables: Variables::new(),
        })
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables.extend(variables);
        self
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }
}

// ---------------------------------------------------------------------------
// 推送
// ---------------------------------------------------------------------------

/// 移动端推送通知
///
/// `data` 是随推送下发给客户端的键值对，不参与模板渲染
#[derive(Debug, Clone, PartialEq)]
pub struct PushNotification {
    recipient: String,
    device_token: String,
    title_template: String,
    body_template: String,
    variables: Variables,
    data: HashMap<String, String>,
}

impl PushNotification {
    pub fn new(
        recipient: impl Into<String>,
        device_token: impl Into<String>,
        title_template: impl Into<String>,
        body_template: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            recipient: require_non_blank("recipient", recipient.into())?,
            device_token: require_non_blank("device_token", device_token.into())?,
            title_template: require_non_blank("title_template", title_template.into())?,
            body_template: require_non_blank("body_template", body_template.into())?,
            variables: Variables::new(),
            data: HashMap::new(),
        })
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables.extend(variables);
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn device_token(&self) -> &str {
        &self.device_token
    }

    pub fn title_template(&self) -> &str {
        &self.title_template
    }

    pub fn body_template(&self) -> &str {
        &self.body_template
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn data(&self) -> &HashMap<String, String> {
        &self.data
    }
}

// ---------------------------------------------------------------------------
// 即时通讯
// ---------------------------------------------------------------------------

/// 即时通讯消息（频道、群聊或房间）
#[derive(Debug, Clone, PartialEq)]
pub struct ChatNotification {
    recipient: String,
    message_template: String,
    variables: Variables,
}

impl ChatNotification {
    pub fn new(recipient: impl Into<String>, message_template: impl Into<String>) -> Result<Self> {
        Ok(Self {
            recipient: require_non_blank("recipient", recipient.into())?,
            message_template: require_non_blank("message_template", message_template.into())?,
            variables: Variables::new(),
        })
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables.extend(variables);
        self
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }
}

// ---------------------------------------------------------------------------
// 通知
// ---------------------------------------------------------------------------

/// 通知
///
/// 封闭的四种渠道变体，由分发器按 [`NotificationKind`] 路由
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Email(EmailNotification),
    Sms(SmsNotification),
    Push(PushNotification),
    Chat(ChatNotification),
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Email(_) => NotificationKind::Email,
            Self::Sms(_) => NotificationKind::Sms,
            Self::Push(_) => NotificationKind::Push,
            Self::Chat(_) => NotificationKind::Chat,
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            Self::Email(n) => n.recipient(),
            Self::Sms(n) => n.recipient(),
            Self::Push(n) => n.recipient(),
            Self::Chat(n) => n.recipient(),
        }
    }

    pub fn variables(&self) -> &Variables {
        match self {
            Self::Email(n) => n.variables(),
            Self::Sms(n) => n.variables(),
            Self::Push(n) => n.variables(),
            Self::Chat(n) => n.variables(),
        }
    }
}

impl From<EmailNotification> for Notification {
    fn from(value: EmailNotification) -> Self {
        Self::Email(value)
    }
}

impl From<SmsNotification> for Notification {
    fn from(value: SmsNotification) -> Self {
        Self::Sms(value)
    }
}

impl From<PushNotification> for Notification {
    fn from(value: PushNotification) -> Self {
        Self::Push(value)
    }
}

impl From<ChatNotification> for Notification {
    fn from(value: ChatNotification) -> Self {
        Self::Chat(value)
    }
}

// ---------------------------------------------------------------------------
// 发送结果
// ---------------------------------------------------------------------------

/// 统一的发送结果
///
/// 服务商拒收属于失败结果而非错误，`error_message` 保存服务商返回的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl NotificationResult {
    pub fn success() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(error_message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
