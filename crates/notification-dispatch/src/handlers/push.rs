//! 推送处理器

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::{NotificationHandler, complete, render_field};
use crate::error::{NotificationError, Result};
use crate::gateway::{PushGateway, PushMessage};
use crate::template::TemplateRenderer;
use crate::types::{Notification, NotificationKind, NotificationResult};

/// 移动端推送处理器
pub struct PushHandler {
    gateway: Arc<dyn PushGateway>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl PushHandler {
    pub fn new(gateway: Arc<dyn PushGateway>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { gateway, renderer }
    }
}

impl NotificationHandler for PushHandler {
    fn kind(&self) -> NotificationKind {
        NotificationKind::Push
    }

    fn description(&self) -> &str {
        "推送通知处理器"
    }

    fn send(&self, notification: &Notification) -> Result<NotificationResult> {
        let Notification::Push(push) = notification else {
            return Err(NotificationError::HandlerMismatch {
                expected: NotificationKind::Push,
                actual: notification.kind(),
            });
        };

        let start = Instant::now();
        let variables = push.variables();
        let message = PushMessage {
            token: push.device_token().to_string(),
            title: render_field(self.renderer.as_ref(), push.title_template(), variables),
            body: render_field(self.renderer.as_ref(), push.body_template(), variables),
            data: push.data().clone(),
        };

        debug!(
            recipient = %push.recipient(),
            title = %message.title,
            data_keys = message.data.len(),
            "推送发送中..."
        );

        let outcome = self.gateway.send(message)?;
        Ok(complete(
            NotificationKind::Push,
            push.recipient(),
            Some(outcome),
            start.elapsed(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayOutcome, MockPushGateway};
    use crate::template::{MockTemplateRenderer, PlaceholderRenderer};
    use crate::types::PushNotification;

    #[test]
    fn test_send_passes_token_and_data() {
        let mut gateway = MockPushGateway::new();
        gateway
            .expect_send()
            .withf(|m| {
                m.token == "device-abc"
                    && m.title == "Order 42"
                    && m.body == "Order 42 shipped"
                    && m.data.get("orderId").map(String::as_str) == Some("42")
            })
            .times(1)
            .returning(|_| Ok(GatewayOutcome::new("success").with_delivery_id("fcm-1")));

        let push = PushNotification::new("user-1", "device-abc", "Order {{id}}", "Order {{id}} shipped")
            .unwrap()
            .with_variable("id", 42)
            .with_data("orderId", "42");

        let handler = PushHandler::new(Arc::new(gateway), Arc::new(PlaceholderRenderer::new()));
        assert!(handler.send(&push.into()).unwrap().is_success());
    }

    #[test]
    fn test_send_without_variables_skips_renderer() {
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().never();

        let mut gateway = MockPushGateway::new();
        gateway
            .expect_send()
            .withf(|m| m.title == "Hi {{name}}" && m.body == "Body")
            .returning(|_| Ok(GatewayOutcome::new("success")));

        let push = PushNotification::new("user-1", "tok", "Hi {{name}}", "Body").unwrap();
        let handler = PushHandler::new(Arc::new(gateway), Arc::new(renderer));
        assert!(handler.send(&push.into()).unwrap().is_success());
    }

    #[test]
    fn test_unregistered_token_is_failure() {
        let mut gateway = MockPushGateway::new();
        gateway.expect_send().returning(|_| {
            Ok(GatewayOutcome::new("failure").with_error("registration token not registered"))
        });

        let push = PushNotification::new("user-1", "stale", "t", "b").unwrap();
        let handler = PushHandler::new(Arc::new(gateway), Arc::new(PlaceholderRenderer::new()));
        let result = handler.send(&push.into()).unwrap();

        assert!(!result.is_success());
        assert_eq!(result.error_message(), Some("registration token not registered"));
    }
}
