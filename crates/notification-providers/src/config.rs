//! 服务商配置校验
//!
//! 配置结构定义在 `notify_shared::config`，这里补充各服务商的必填项检查

use notify_shared::config::{
    FirebaseConfig, MailgunConfig, SendGridConfig, SlackConfig, TwilioConfig,
};

use crate::error::ProviderError;

pub trait ValidateProviderConfig {
    fn validate(&self) -> Result<(), ProviderError>;
}

fn require(provider: &'static str, field: &'static str, value: &str) -> Result<(), ProviderError> {
    if value.trim().is_empty() {
        return Err(ProviderError::MissingField { provider, field });
    }
    Ok(())
}

fn require_url(provider: &'static str, field: &'static str, value: &str) -> Result<(), ProviderError> {
    require(provider, field, value)?;
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        return Err(ProviderError::InvalidField {
            provider,
            field,
            message: "必须以 http:// 或 https:// 开头".to_string(),
        });
    }
    Ok(())
}

impl ValidateProviderConfig for SendGridConfig {
    fn validate(&self) -> Result<(), ProviderError> {
        require("sendgrid", "api_key", &self.api_key)?;
        require_url("sendgrid", "base_url", &self.base_url)
    }
}

impl ValidateProviderConfig for MailgunConfig {
    fn validate(&self) -> Result<(), ProviderError> {
        require("mailgun", "api_key", &self.api_key)?;
        require("mailgun", "domain", &self.domain)?;
        require_url("mailgun", "base_url", &self.base_url)
    }
}

impl ValidateProviderConfig for TwilioConfig {
    fn validate(&self) -> Result<(), ProviderError> {
        require("twilio", "account_sid", &self.account_sid)?;
        require("twilio", "auth_token", &self.auth_token)?;
        require("twilio", "from_number", &self.from_number)
    }
}

impl ValidateProviderConfig for FirebaseConfig {
    fn validate(&self) -> Result<(), ProviderError> {
        require("firebase", "project_id", &self.project_id)?;
        require("firebase", "service_account_key", &self.service_account_key)
    }
}

impl ValidateProviderConfig for SlackConfig {
    /// Webhook 与 Bot token 至少配置一个
    fn validate(&self) -> Result<(), ProviderError> {
        let has_webhook = self
            .webhook_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        let has_token = self
            .bot_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty());

        if !has_webhook && !has_token {
            return Err(ProviderError::MissingField {
                provider: "slack",
                field: "webhook_url",
            });
        }
        if let Some(url) = self.webhook_url.as_deref().filter(|_| has_webhook) {
            require_url("slack", "webhook_url", url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SendGridConfig::default().validate().is_ok());
        assert!(MailgunConfig::default().validate().is_ok());
        assert!(TwilioConfig::default().validate().is_ok());
        assert!(FirebaseConfig::default().validate().is_ok());
        assert!(SlackConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_required_fields() {
        let config = TwilioConfig {
            auth_token: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ProviderError::MissingField {
                provider: "twilio",
                field: "auth_token"
            })
        ));

        let config = MailgunConfig {
            domain: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ProviderError::MissingField { field: "domain", .. })
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = SendGridConfig {
            base_url: "api.sendgrid.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ProviderError::InvalidField { field: "base_url", .. })
        ));
    }

    #[test]
    fn test_slack_needs_webhook_or_token() {
        let config = SlackConfig {
            webhook_url: None,
            bot_token: None,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SlackConfig {
            webhook_url: None,
            bot_token: Some("xoxb-test".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
