//! 演示流程
//!
//! 依次演示同步邮件、异步邮件、同步短信、批量推送，关闭工作池后再同步发送一条即时消息。

use notification_dispatch::{
    ChatNotification, EmailNotification, Notification, NotificationDispatcher,
    NotificationResult, PushNotification, SmsNotification,
};
use notify_shared::config::{AppConfig, SenderDefaults};
use tracing::{info, warn};

use crate::error::WorkerError;

/// 单次发送的演示记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoEntry {
    pub label: &'static str,
    pub result: NotificationResult,
}

/// 演示运行结果
#[derive(Debug, Default)]
pub struct DemoReport {
    pub entries: Vec<DemoEntry>,
}

impl DemoReport {
    fn record(&mut self, label: &'static str, result: NotificationResult) {
        if result.is_success() {
            info!(label = label, "发送成功");
        } else {
            warn!(label = label, reason = ?result.error_message(), "发送失败");
        }
        self.entries.push(DemoEntry { label, result });
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }
}

fn email_sender(defaults: &SenderDefaults) -> Result<&str, WorkerError> {
    defaults
        .email_sender
        .as_deref()
        .ok_or(WorkerError::MissingSender { channel: "EMAIL" })
}

fn sms_sender(defaults: &SenderDefaults) -> Result<&str, WorkerError> {
    defaults
        .sms_sender
        .as_deref()
        .ok_or(WorkerError::MissingSender { channel: "SMS" })
}

/// 检查演示所需的发送方默认值是否齐全
///
/// 配置目录缺失时所有配置文件都会被跳过，启动时先检查，避免装配完才失败
pub fn check_senders(defaults: &SenderDefaults) -> Result<(), WorkerError> {
    email_sender(defaults)?;
    sms_sender(defaults)?;
    Ok(())
}

/// 运行演示
///
/// 结束时工作池已关闭
pub async fn run(
    dispatcher: &NotificationDispatcher,
    config: &AppConfig,
) -> Result<DemoReport, WorkerError> {
    let mut report = DemoReport::default();
    let email_from = email_sender(&config.defaults)?;
    let sms_from = sms_sender(&config.defaults)?;

    // 1. 同步邮件，不带变量
    let plain = EmailNotification::new(email_from, "sync@example.com", "Hello", "Greetings")?;
    report.record("email-sync", dispatcher.send(&plain.into())?);

    // 2. 异步邮件，带模板变量
    let welcome = EmailNotification::new(
        email_from,
        "async@example.com",
        "Hello {{name}}",
        "Welcome {{name}} to {{app}}",
    )?
    .with_variable("name", "Alice")
    .with_variable("app", "Notification Center");
    report.record("email-async", dispatcher.send_async(welcome.into()).await?);

    // 3. 同步短信
    let otp = SmsNotification::new(sms_from, "+15551234567", "Hi {{name}}, your code is {{code}}")?
        .with_variable("name", "Alice")
        .with_variable("code", "123456");
    report.record("sms-sync", dispatcher.send(&otp.into())?);

    // 4. 批量推送
    let pushes = ["device-token-abc", "device-token-bcd"]
        .into_iter()
        .map(|token| {
            PushNotification::new("user-123", token, "Hello {{name}}", "Your code is {{code}}")
                .map(|push| {
                    push.with_variable("name", "Alice")
                        .with_variable("code", "9999")
                        .with_data("screen", "home")
                        .into()
                })
        })
        .collect::<Result<Vec<Notification>, _>>()?;
    for result in dispatcher.send_batch_async(pushes).await? {
        report.record("push-batch", result);
    }

    dispatcher.shutdown();

    // 5. 工作池关闭后同步发送仍然可用
    let channel = config
        .providers
        .slack
        .default_channel
        .clone()
        .unwrap_or_else(|| "#general".to_string());
    let chat = ChatNotification::new(channel, "Welcome message")?;
    report.record("chat-sync", dispatcher.send(&chat.into())?);

    info!(
        total = report.entries.len(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "演示完成"
    );

    Ok(report)
}
