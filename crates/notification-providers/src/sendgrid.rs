//! SendGrid 邮件网关
//!
//! SendGrid 受理后返回 `accepted`，其余状态视为拒收并带回错误列表。

use notification_dispatch::{EmailGateway, EmailMessage, GatewayOutcome};
use notify_shared::config::SendGridConfig;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ValidateProviderConfig;
use crate::error::ProviderError;

#[derive(Debug, Serialize)]
struct SendGridRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    content: &'a str,
}

#[derive(Debug)]
struct SendGridResponse {
    message_id: String,
    status: String,
    errors: Vec<String>,
}

pub struct SendGridEmailGateway {
    config: SendGridConfig,
    /// 模拟拒收时返回的错误列表
    simulated_errors: Option<Vec<String>>,
}

impl SendGridEmailGateway {
    pub fn new(config: SendGridConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        Ok(Self {
            config,
            simulated_errors: None,
        })
    }

    /// 之后的每次发送都模拟服务商拒收
    /// 模拟服务商拒收，空列表等同于不模拟失败
    pub fn with_simulated_failure(mut self, errors: Vec<String>) -> Self {
        self.simulated_errors = (!errors.is_empty()).then_some(errors);
        self
    }

    fn simulated_send(&self, request: &SendGridRequest<'_>) -> SendGridResponse {
        let payload = serde_json::to_string(request).unwrap_or_default();
        debug!(
            endpoint = %self.config.base_url,
            to = %request.to,
            payload_bytes = payload.len(),
            "模拟调用 SendGrid"
        );

        match &self.simulated_errors {
            Some(errors) => SendGridResponse {
                message_id: String::new(),
                status: "rejected".to_string(),
                errors: errors.clone(),
            },
            None => SendGridResponse {
                message_id: format!("sg-{}", Uuid::now_v7()),
                status: "accepted".to_string(),
                errors: Vec::new(),
            },
        }
    }
}

impl EmailGateway for SendGridEmailGateway {
    fn send(&self, message: EmailMessage) -> notification_dispatch::Result<GatewayOutcome> {
        let request = SendGridRequest {
            from: &message.from,
            to: &message.to,
            subject: &message.subject,
            content: &message.body,
        };

        let response = self.simulated_send(&request);

        if response.status.eq_ignore_ascii_case("accepted") {
            info!(
                provider = "sendgrid",
                to = %message.to,
                message_id = %response.message_id,
                "邮件已提交"
            );
            return Ok(GatewayOutcome::new(response.status).with_delivery_id(response.message_id));
        }

        Ok(GatewayOutcome::new(response.status).with_error(response.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            from: "noreply@example.com".to_string(),
            to: "user@example.com".to_string(),
            subject: "Hi".to_string(),
            body: "Hello".to_string(),
        }
    }

    #[test]
    fn test_accepted_send() {
        let gateway = SendGridEmailGateway::new(SendGridConfig::default()).unwrap();
        let outcome = gateway.send(message()).unwrap();

        assert_eq!(outcome.status, "accepted");
        assert!(outcome.delivery_id.as_deref().unwrap().starts_with("sg-"));
        assert_eq!(outcome.failure_reason(), None);
    }

    #[test]
    fn test_simulated_rejection() {
        let gateway = SendGridEmailGateway::new(SendGridConfig::default())
            .unwrap()
            .with_simulated_failure(vec!["does not contain a valid address".to_string()]);
        let outcome = gateway.send(message()).unwrap();

        assert_eq!(outcome.status, "rejected");
        assert!(outcome.delivery_id.is_none());
        assert_eq!(
            outcome.failure_reason().as_deref(),
            Some("does not contain a valid address")
        );
    }

    #[test]
    fn test_empty_simulated_failure_is_ignored() {
        let gateway = SendGridEmailGateway::new(SendGridConfig::default())
            .unwrap()
            .with_simulated_failure(Vec::new());
        let outcome = gateway.send(message()).unwrap();

        assert_eq!(outcome.status, "accepted");
        assert!(outcome.delivery_id.is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SendGridConfig {
            api_key: String::new(),
            ..Default::default()
        };
        assert!(SendGridEmailGateway::new(config).is_err());
    }
}
