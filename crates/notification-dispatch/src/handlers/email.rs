//! 邮件处理器

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::{NotificationHandler, complete, render_field};
use crate::error::{NotificationError, Result};
use crate::gateway::{EmailGateway, EmailMessage};
use crate::template::TemplateRenderer;
use crate::types::{Notification, NotificationKind, NotificationResult};

/// 邮件处理器
///
/// 渲染主题和正文后交给邮件网关
pub struct EmailHandler {
    gateway: Arc<dyn EmailGateway>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl EmailHandler {
    pub fn new(gateway: Arc<dyn EmailGateway>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { gateway, renderer }
    }
}

impl NotificationHandler for EmailHandler {
    fn kind(&self) -> NotificationKind {
        NotificationKind::Email
    }

    fn description(&self) -> &str {
        "邮件通知处理器"
    }

    fn send(&self, notification: &Notification) -> Result<NotificationResult> {
        let Notification::Email(email) = notification else {
            return Err(NotificationError::HandlerMismatch {
                expected: NotificationKind::Email,
                actual: notification.kind(),
            });
        };

        let start = Instant::now();
        let variables = email.variables();
        let message = EmailMessage {
            from: email.sender().to_string(),
            to: email.recipient().to_string(),
            subject: render_field(self.renderer.as_ref(), email.subject_template(), variables),
            body: render_field(self.renderer.as_ref(), email.body_template(), variables),
        };

        debug!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            "邮件发送中..."
        );

        let outcome = self.gateway.send(message)?;
        Ok(complete(
            NotificationKind::Email,
            email.recipient(),
            Some(outcome),
            start.elapsed(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayOutcome, MockEmailGateway};
    use crate::template::{MockTemplateRenderer, PlaceholderRenderer};
    use crate::types::{EmailNotification, SmsNotification};

    fn welcome_email() -> EmailNotification {
        EmailNotification::new(
            "noreply@example.com",
            "user@example.com",
            "Welcome {{name}}",
            "Hello {{name}}",
        )
        .unwrap()
    }

    #[test]
    fn test_send_renders_and_reports_success() {
        let mut gateway = MockEmailGateway::new();
        gateway
            .expect_send()
            .withf(|m| {
                m.from == "noreply@example.com"
                    && m.to == "user@example.com"
                    && m.subject == "Welcome Alice"
                    && m.body == "Hello Alice"
            })
            .times(1)
            .returning(|_| Ok(GatewayOutcome::new("accepted").with_delivery_id("sg-1")));

        let handler = EmailHandler::new(Arc::new(gateway), Arc::new(PlaceholderRenderer::new()));
        let notification = Notification::from(welcome_email().with_variable("name", "Alice"));

        let result = handler.send(&notification).unwrap();
        assert!(result.is_success());
        assert_eq!(result.error_message(), None);
    }

    #[test]
    fn test_send_without_variables_uses_raw_templates() {
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().never();

        let mut gateway = MockEmailGateway::new();
        gateway
            .expect_send()
            .withf(|m| m.subject == "Welcome {{name}}" && m.body == "Hello {{name}}")
            .times(1)
            .returning(|_| Ok(GatewayOutcome::new("accepted")));

        let handler = EmailHandler::new(Arc::new(gateway), Arc::new(renderer));
        let result = handler.send(&welcome_email().into()).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_send_reports_provider_rejection() {
        let mut gateway = MockEmailGateway::new();
        gateway.expect_send().returning(|_| {
            Ok(GatewayOutcome::new("FAILED")
                .with_error(vec!["mailbox full".to_string(), "retry later".to_string()]))
        });

        let handler = EmailHandler::new(Arc::new(gateway), Arc::new(PlaceholderRenderer::new()));
        let result = handler.send(&welcome_email().into()).unwrap();

        assert!(!result.is_success());
        assert_eq!(result.error_message(), Some("mailbox full; retry later"));
    }

    #[test]
    fn test_gateway_error_propagates() {
        let mut gateway = MockEmailGateway::new();
        gateway
            .expect_send()
            .returning(|_| Err(NotificationError::gateway("EMAIL", "connection refused")));

        let handler = EmailHandler::new(Arc::new(gateway), Arc::new(PlaceholderRenderer::new()));
        let err = handler.send(&welcome_email().into()).unwrap_err();
        assert!(matches!(err, NotificationError::Gateway { .. }));
    }

    #[test]
    fn test_wrong_variant_is_mismatch() {
        let mut gateway = MockEmailGateway::new();
        gateway.expect_send().never();

        let handler = EmailHandler::new(Arc::new(gateway), Arc::new(PlaceholderRenderer::new()));
        let sms = SmsNotification::new("+15550000000", "+15551234567", "hi").unwrap();

        let err = handler.send(&sms.into()).unwrap_err();
        assert!(matches!(
            err,
            NotificationError::HandlerMismatch {
                expected: NotificationKind::Email,
                actual: NotificationKind::Sms,
            }
        ));
    }
}
