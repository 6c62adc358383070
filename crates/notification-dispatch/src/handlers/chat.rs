//! 即时通讯处理器

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::{NotificationHandler, complete, render_field};
use crate::error::{NotificationError, Result};
use crate::gateway::{ChatGateway, ChatMessage};
use crate::template::TemplateRenderer;
use crate::types::{Notification, NotificationKind, NotificationResult};

pub struct ChatHandler {
    gateway: Arc<dyn ChatGateway>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl ChatHandler {
    pub fn new(gateway: Arc<dyn ChatGateway>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { gateway, renderer }
    }
}

impl NotificationHandler for ChatHandler {
    fn kind(&self) -> NotificationKind {
        NotificationKind::Chat
    }

    fn description(&self) -> &str {
        "即时通讯处理器"
    }

    fn send(&self, notification: &Notification) -> Result<NotificationResult> {
        let Notification::Chat(chat) = notification else {
            return Err(NotificationError::HandlerMismatch {
                expected: NotificationKind::Chat,
                actual: notification.kind(),
            });
        };

        let start = Instant::now();
        let message = ChatMessage {
            destination: chat.recipient().to_string(),
            text: render_field(self.renderer.as_ref(), chat.message_template(), chat.variables()),
        };

        debug!(destination = %message.destination, "即时消息发送中...");

        let outcome = self.gateway.send(message)?;
        Ok(complete(
            NotificationKind::Chat,
            chat.recipient(),
            Some(outcome),
            start.elapsed(),
        ))
    }
}
