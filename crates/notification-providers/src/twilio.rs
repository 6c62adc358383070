//! Twilio 短信网关
//!
//! 实际发送号码以 Twilio 账号配置的 `from_number` 为准，消息中的发送方只用于日志。

use notification_dispatch::{GatewayOutcome, SmsGateway, SmsMessage};
use notify_shared::config::TwilioConfig;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ValidateProviderConfig;
use crate::error::ProviderError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TwilioRequest<'a> {
    from: &'a str,
    to: &'a str,
    body: &'a str,
}

#[derive(Debug)]
struct TwilioResponse {
    sid: String,
    status: String,
    errors: Vec<String>,
}

pub struct TwilioSmsGateway {
    config: TwilioConfig,
    simulated_errors: Option<Vec<String>>,
}

impl TwilioSmsGateway {
    pub fn new(config: TwilioConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        Ok(Self {
            config,
            simulated_errors: None,
        })
    }

    /// 模拟服务商拒收，空列表等同于不模拟失败
    pub fn with_simulated_failure(mut self, errors: Vec<String>) -> Self {
        self.simulated_errors = (!errors.is_empty()).then_some(errors);
        self
    }

    fn simulated_send(&self, request: &TwilioRequest<'_>) -> TwilioResponse {
        let payload = serde_json::to_string(request).unwrap_or_default();
        debug!(
            account_sid = %self.config.account_sid,
            to = %request.to,
            payload_bytes = payload.len(),
            "模拟调用 Twilio"
        );

        match &self.simulated_errors {
            Some(errors) => TwilioResponse {
                sid: String::new(),
                status: "failed".to_string(),
                errors: errors.clone(),
            },
            None => TwilioResponse {
                sid: format!("SM{}", Uuid::now_v7().simple()),
                status: "queued".to_string(),
                errors: Vec::new(),
            },
        }
    }
}

impl SmsGateway for TwilioSmsGateway {
    fn send(&self, message: SmsMessage) -> notification_dispatch::Result<Option<GatewayOutcome>> {
        let request = TwilioRequest {
            from: &self.config.from_number,
            to: &message.to,
            body: &message.body,
        };

        let response = self.simulated_send(&request);

        if response.status.eq_ignore_ascii_case("queued") {
            info!(
                provider = "twilio",
                to = %message.to,
                requested_from = %message.from,
                sid = %response.sid,
                "短信已进入发送队列"
            );
            return Ok(Some(
                GatewayOutcome::new(response.status).with_delivery_id(response.sid),
            ));
        }

        Ok(Some(
            GatewayOutcome::new(response.status).with_error(response.errors),
        ))
    }
}
