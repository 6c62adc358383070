//! Slack 即时通讯网关
//!
//! Slack 只返回成功标志和可选的错误描述，失败时以单条错误内容上报。

use notification_dispatch::{ChatGateway, ChatMessage, GatewayOutcome};
use notify_shared::config::SlackConfig;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ValidateProviderConfig;
use crate::error::ProviderError;

#[derive(Debug, Serialize)]
struct SlackRequest<'a> {
    channel: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_emoji: Option<&'a str>,
}

#[derive(Debug)]
struct SlackResponse {
    ok: bool,
    ts: Option<String>,
    error: Option<String>,
}

pub struct SlackChatGateway {
    config: SlackConfig,
    simulated_errors: Option<Vec<String>>,
}

impl SlackChatGateway {
    pub fn new(config: SlackConfig) -> Result<Self, ProviderError> {
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

    fn simulated_send(&self, request: &SlackRequest<'_>) -> SlackResponse {
        let payload = serde_json::to_string(request).unwrap_or_default();
        let via = if self.config.bot_token.is_some() {
            "chat.postMessage"
        } else {
            "webhook"
        };
        debug!(
            via = via,
            channel = %request.channel,
            payload_bytes = payload.len(),
            "模拟调用 Slack"
        );

        match &self.simulated_errors {
            Some(errors) => SlackResponse {
                ok: false,
                ts: None,
                error: Some(errors.join("; ")),
            },
            None => SlackResponse {
                ok: true,
                ts: Some(Uuid::now_v7().to_string()),
                error: None,
            },
        }
    }
}

impl ChatGateway for SlackChatGateway {
    fn send(&self, message: ChatMessage) -> notification_dispatch::Result<GatewayOutcome> {
        let request = SlackRequest {
            channel: &message.destination,
            text: &message.text,
            username: self.config.username.as_deref(),
            icon_emoji: self.config.icon_emoji.as_deref(),
        };

        let response = self.simulated_send(&request);

        if !response.ok {
            let error = response
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "Slack 消息发送失败".to_string());
            warn!(provider = "slack", channel = %message.destination, error = %error, "Slack 返回失败");
            return Ok(GatewayOutcome::new("ERROR").with_error(error));
        }

        let ts = response.ts.unwrap_or_default();
        info!(
            provider = "slack",
            channel = %message.destination,
            ts = %ts,
            "消息已发送"
        );
        Ok(GatewayOutcome::new("SENT").with_delivery_id(ts))
    }
}
