//! Firebase Cloud Messaging 推送网关

use std::collections::HashMap;

use notification_dispatch::{GatewayOutcome, PushGateway, PushMessage};
use notify_shared::config::FirebaseConfig;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ValidateProviderConfig;
use crate::error::ProviderError;

#[derive(Debug, Serialize)]
struct FirebaseNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct FirebaseRequest<'a> {
    token: &'a str,
    notification: FirebaseNotification<'a>,
    #[serde(skip_serializing_if = "no_data")]
    data: &'a HashMap<String, String>,
}

fn no_data(data: &&HashMap<String, String>) -> bool {
    data.is_empty()
}

#[derive(Debug)]
struct FirebaseResponse {
    message_id: String,
    status: String,
    errors: Vec<String>,
}

pub struct FirebasePushGateway {
    config: FirebaseConfig,
    simulated_errors: Option<Vec<String>>,
}

impl FirebasePushGateway {
    pub fn new(config: FirebaseConfig) -> Result<Self, ProviderError> {
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

    fn simulated_send(&self, request: &FirebaseRequest<'_>) -> FirebaseResponse {
        let payload = serde_json::to_string(request).unwrap_or_default();
        debug!(
            project_id = %self.config.project_id,
            payload_bytes = payload.len(),
            "模拟调用 FCM"
        );

        match &self.simulated_errors {
            Some(errors) => FirebaseResponse {
                message_id: String::new(),
                status: "failure".to_string(),
                errors: errors.clone(),
            },
            None => FirebaseResponse {
                message_id: format!(
                    "projects/{}/messages/{}",
                    self.config.project_id,
                    Uuid::now_v7()
                ),
                status: "success".to_string(),
                errors: Vec::new(),
            },
        }
    }
}

impl PushGateway for FirebasePushGateway {
    fn send(&self, message: PushMessage) -> notification_dispatch::Result<GatewayOutcome> {
        let request = FirebaseRequest {
            token: &message.token,
            notification: FirebaseNotification {
                title: &message.title,
                body: &message.body,
            },
            data: &message.data,
        };

        let response = self.simulated_send(&request);

        if response.status.eq_ignore_ascii_case("success") {
            info!(
                provider = "firebase",
                message_id = %response.message_id,
                "推送已提交"
            );
            return Ok(GatewayOutcome::new(response.status).with_delivery_id(response.message_id));
        }

        Ok(GatewayOutcome::new(response.status).with_error(response.errors))
    }
}
