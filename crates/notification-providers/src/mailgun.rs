//! Mailgun 邮件网关
//!
//! Mailgun 只要响应中没有错误就算受理成功，统一状态为 `SENT`，否则为 `FAILED`。

use notification_dispatch::{EmailGateway, EmailMessage, GatewayOutcome};
use notify_shared::config::MailgunConfig;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ValidateProviderConfig;
use crate::error::ProviderError;

#[derive(Debug, Serialize)]
struct MailgunRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    domain: &'a str,
}

#[derive(Debug)]
struct MailgunResponse {
    id: String,
    message: String,
    errors: Vec<String>,
}

pub struct MailgunEmailGateway {
    config: MailgunConfig,
    simulated_errors: Option<Vec<String>>,
}

impl MailgunEmailGateway {
    pub fn new(config: MailgunConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        Ok(Self {
            config,
            simulated_errors: None,
        })
    }

    pub fn with_simulated_failure(mut self, errors: Vec<String>) -> Self {
        self.simulated_errors = Some(errors);
        self
    }

    fn simulated_send(&self, request: &MailgunRequest<'_>) -> MailgunResponse {
        let payload = serde_json::to_string(request).unwrap_or_default();
        debug!(
            endpoint = %format!("{}/{}/messages", self.config.base_url, request.domain),
            to = %request.to,
            payload_bytes = payload.len(),
            "模拟调用 Mailgun"
        );

        MailgunResponse {
            id: format!("<{}@{}>", Uuid::now_v7(), request.domain),
            message: "Queued. Thank you.".to_string(),
            errors: self.simulated_errors.clone().unwrap_or_default(),
        }
    }
}

impl EmailGateway for MailgunEmailGateway {
    fn send(&self, message: EmailMessage) -> notification_dispatch::Result<GatewayOutcome> {
        let request = MailgunRequest {
            from: &message.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
            domain: &self.config.domain,
        };

        let response = self.simulated_send(&request);

        if response.errors.is_empty() {
            info!(
                provider = "mailgun",
                to = %message.to,
                message_id = %response.id,
                detail = %response.message,
                "邮件已提交"
            );
            return Ok(GatewayOutcome::new("SENT").with_delivery_id(response.id));
        }

        Ok(GatewayOutcome::new("FAILED").with_error(response.errors))
    }
}
