//! 组件装配
//!
//! 按配置创建服务商网关 -> 渠道处理器 -> 注册表 -> 分发器。

use std::sync::Arc;

use notification_dispatch::{
    ChatHandler, EmailGateway, EmailHandler, HandlerRegistry, NotificationDispatcher,
    PlaceholderRenderer, PushHandler, SmsHandler, TemplateRenderer,
};
use notification_providers::{
    FirebasePushGateway, MailgunEmailGateway, SendGridEmailGateway, SlackChatGateway,
    TwilioSmsGateway,
};
use notify_shared::config::{AppConfig, EmailProviderKind, ProvidersConfig};
use tracing::info;

use crate::error::WorkerError;

/// 按配置选择邮件服务商
fn email_gateway(config: &ProvidersConfig) -> Result<Arc<dyn EmailGateway>, WorkerError> {
    let gateway: Arc<dyn EmailGateway> = match config.email {
        EmailProviderKind::SendGrid => Arc::new(SendGridEmailGateway::new(config.sendgrid.clone())?),
        EmailProviderKind::Mailgun => Arc::new(MailgunEmailGateway::new(config.mailgun.clone())?),
    };
    Ok(gateway)
}

/// 创建包含四个渠道处理器的注册表
///
/// 所有处理器共享同一个模板渲染器
pub fn build_registry(
    config: &ProvidersConfig,
    renderer: Arc<dyn TemplateRenderer>,
) -> Result<HandlerRegistry, WorkerError> {
    let mut registry = HandlerRegistry::new();

    registry
        .register(Arc::new(EmailHandler::new(
            email_gateway(config)?,
            renderer.clone(),
        )))
        .register(Arc::new(SmsHandler::new(
            Arc::new(TwilioSmsGateway::new(config.twilio.clone())?),
            renderer.clone(),
        )))
        .register(Arc::new(PushHandler::new(
            Arc::new(FirebasePushGateway::new(config.firebase.clone())?),
            renderer.clone(),
        )))
        .register(Arc::new(ChatHandler::new(
            Arc::new(SlackChatGateway::new(config.slack.clone())?),
            renderer,
        )));

    info!(
        handler_count = registry.len(),
        email_provider = ?config.email,
        "渠道处理器初始化完成"
    );

    Ok(registry)
}

/// 创建分发器
///
/// 工作池建立在当前 tokio runtime 上
pub fn build_dispatcher(config: &AppConfig) -> Result<NotificationDispatcher, WorkerError> {
    let renderer: Arc<dyn TemplateRenderer> = Arc::new(PlaceholderRenderer::new());
    let registry = build_registry(&config.providers, renderer)?;
    Ok(NotificationDispatcher::with_config(registry, &config.dispatch)?)
}
