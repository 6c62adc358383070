//! 短信处理器

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::{NotificationHandler, complete, render_field};
use crate::error::{NotificationError, Result};
use crate::gateway::{SmsGateway, SmsMessage};
use crate::template::TemplateRenderer;
use crate::types::{Notification, NotificationKind, NotificationResult};

/// 短信处理器
///
/// 网关返回 `None`（服务商未回包）时按成功处理，这一点与其他渠道不同
pub struct SmsHandler {
    gateway: Arc<dyn SmsGateway>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl SmsHandler {
    pub fn new(gateway: Arc<dyn SmsGateway>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { gateway, renderer }
    }
}

impl NotificationHandler for SmsHandler {
    fn kind(&self) -> NotificationKind {
        NotificationKind::Sms
    }

    fn description(&self) -> &str {
        "短信通知处理器"
    }

    fn send(&self, notification: &Notification) -> Result<NotificationResult> {
        let Notification::Sms(sms) = notification else {
            return Err(NotificationError::HandlerMismatch {
                expected: NotificationKind::Sms,
                actual: notification.kind(),
            });
        };

        let start = Instant::now();
        let message = SmsMessage {
            from: sms.sender().to_string(),
            to: sms.recipient().to_string(),
            body: render_field(self.renderer.as_ref(), sms.message_template(), sms.variables()),
        };

        debug!(from = %message.from, to = %message.to, "短信发送中...");

        let outcome = self.gateway.send(message)?;
        Ok(complete(
            NotificationKind::Sms,
            sms.recipient(),
            outcome,
            start.elapsed(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayOutcome, MockSmsGateway};
    use crate::template::{MockTemplateRenderer, PlaceholderRenderer};
    use crate::types::{ChatNotification, SmsNotification};

    fn otp_sms() -> SmsNotification {
        SmsNotification::new("+15550000000", "+15551234567", "Code {{code}}").unwrap()
    }

    #[test]
    fn test_send_renders_message() {
        let mut gateway = MockSmsGateway::new();
        gateway
            .expect_send()
            .withf(|m| m.from == "+15550000000" && m.to == "+15551234567" && m.body == "Code 123456")
            .times(1)
            .returning(|_| Ok(Some(GatewayOutcome::new("queued").with_delivery_id("SM1"))));

        let handler = SmsHandler::new(Arc::new(gateway), Arc::new(PlaceholderRenderer::new()));
        let result = handler
            .send(&otp_sms().with_variable("code", 123456).into())
            .unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_missing_outcome_is_success() {
        let mut gateway = MockSmsGateway::new();
        gateway.expect_send().times(1).returning(|_| Ok(None));

        let handler = SmsHandler::new(Arc::new(gateway), Arc::new(PlaceholderRenderer::new()));
        let result = handler.send(&otp_sms().into()).unwrap();

        assert!(result.is_success());
        assert_eq!(result.error_message(), None);
    }

    #[test]
    fn test_provider_rejection_carries_reason() {
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().never();

        let mut gateway = MockSmsGateway::new();
        gateway
            .expect_send()
            .withf(|m| m.body == "Code {{code}}")
            .returning(|_| Ok(Some(GatewayOutcome::new("failed").with_error("invalid number"))));

        let handler = SmsHandler::new(Arc::new(gateway), Arc::new(renderer));
        let result = handler.send(&otp_sms().into()).unwrap();

        assert!(!result.is_success());
        assert_eq!(result.error_message(), Some("invalid number"));
    }

    #[test]
    fn test_wrong_variant_is_mismatch() {
        let handler = SmsHandler::new(
            Arc::new(MockSmsGateway::new()),
            Arc::new(PlaceholderRenderer::new()),
        );
        let chat = ChatNotification::new("#general", "hi").unwrap();

        assert!(matches!(
            handler.send(&chat.into()),
            Err(NotificationError::HandlerMismatch {
                expected: NotificationKind::Sms,
                actual: NotificationKind::Chat,
            })
        ));
    }
}
