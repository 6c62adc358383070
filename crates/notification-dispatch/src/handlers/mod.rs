//! 渠道处理器
//!
//! 每种通知类型对应一个 Handler：渲染模板、组装渠道消息、调用网关，
//! 再把网关结果翻译成统一的 [`NotificationResult`]。
//!
//! ## 支持的渠道
//!
//! - **Email**: 主题与正文两个模板
//! - **Sms**: 单个消息模板，网关可能不返回结果
//! - **Push**: 标题与正文模板，附带透传数据
//! - **Chat**: 单个消息模板

mod chat;
mod email;
mod push;
mod sms;

pub use chat::ChatHandler;
pub use email::EmailHandler;
pub use push::PushHandler;
pub use sms::SmsHandler;

use std::time::Duration;

use notify_shared::observability::metrics;
use tracing::{info, warn};

use crate::error::Result;
use crate::gateway::GatewayOutcome;
use crate::template::TemplateRenderer;
use crate::types::{Notification, NotificationKind, NotificationResult, Variables};

/// 通知处理器 trait
///
/// 实现必须无状态或只读共享，分发器会在多个工作线程上并发调用同一实例
#[cfg_attr(test, mockall::automock)]
pub trait NotificationHandler: Send + Sync {
    /// 处理的通知类型，注册表以此为索引
    fn kind(&self) -> NotificationKind;

    /// 处理器描述（用于日志）
    fn description(&self) -> &str;

    /// 发送一条通知
    ///
    /// 服务商拒收返回 `Ok(NotificationResult::failure(..))`，
    /// 网关基础设施异常和类型不匹配返回 `Err`
    fn send(&self, notification: &Notification) -> Result<NotificationResult>;
}

/// 变量为空时直接使用原始模板，不调用渲染器
pub(crate) fn render_field(
    renderer: &dyn TemplateRenderer,
    template: &str,
    variables: &Variables,
) -> String {
    if variables.is_empty() {
        template.to_string()
    } else {
        renderer.render(template, variables)
    }
}

/// 网关结果转统一发送结果，并记录日志和指标
///
/// `outcome` 为 None 表示服务商未返回响应，按成功处理
pub(crate) fn complete(
    kind: NotificationKind,
    recipient: &str,
    outcome: Option<GatewayOutcome>,
    elapsed: Duration,
) -> NotificationResult {
    let reason = outcome.as_ref().and_then(GatewayOutcome::failure_reason);
    let delivery_id = outcome.as_ref().and_then(|o| o.delivery_id.clone());
    let status = outcome.as_ref().map(|o| o.status.as_str()).unwrap_or("");

    let result = match reason {
        None => {
            info!(
                channel = %kind,
                recipient = %recipient,
                delivery_id = ?delivery_id,
                status = %status,
                "通知投递成功"
            );
            NotificationResult::success()
        }
        Some(reason) => {
            warn!(
                channel = %kind,
                recipient = %recipient,
                status = %status,
                reason = %reason,
                "服务商拒绝投递"
            );
            NotificationResult::failure(reason)
        }
    };

    let label = if result.is_success() { "success" } else { "failure" };
    metrics::record_notification_sent(kind.as_str(), label, elapsed.as_secs_f64());

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::MockTemplateRenderer;
    use serde_json::json;

    #[test]
    fn test_render_field_skips_renderer_for_empty_variables() {
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().never();

        let rendered = render_field(&renderer, "Hello {{name}}", &Variables::new());
        assert_eq!(rendered, "Hello {{name}}");
    }

    #[test]
    fn test_render_field_delegates_when_variables_present() {
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .withf(|template, variables| template == "Hello {{name}}" && variables.len() == 1)
            .times(1)
            .returning(|_, _| "Hello Alice".to_string());

        let mut variables = Variables::new();
        variables.insert("name".to_string(), json!("Alice"));

        assert_eq!(
            render_field(&renderer, "Hello {{name}}", &variables),
            "Hello Alice"
        );
    }

    #[test]
    fn test_complete_translates_outcomes() {
        let elapsed = Duration::from_millis(5);

        let result = complete(NotificationKind::Sms, "+15551234567", None, elapsed);
        assert!(result.is_success());

        let outcome = GatewayOutcome::new("accepted").with_delivery_id("m-1");
        let result = complete(NotificationKind::Email, "a@example.com", Some(outcome), elapsed);
        assert!(result.is_success());

        let outcome = GatewayOutcome::new("failed").with_error("invalid number");
        let result = complete(NotificationKind::Sms, "+15551234567", Some(outcome), elapsed);
        assert!(!result.is_success());
        assert_eq!(result.error_message(), Some("invalid number"));
    }

    #[test]
    fn test_complete_blank_error_content_is_failure() {
        let elapsed = Duration::from_millis(1);

        let outcome = GatewayOutcome::new("failed").with_error(" ");
        let result = complete(NotificationKind::Email, "a@example.com", Some(outcome), elapsed);
        assert!(!result.is_success());
        assert_eq!(result.error_message(), Some(" "));

        let outcome = GatewayOutcome::new("FAILED").with_error(vec![String::new()]);
        let result = complete(NotificationKind::Email, "a@example.com", Some(outcome), elapsed);
        assert!(!result.is_success());
        assert_eq!(result.error_message(), Some(""));
    }
}
