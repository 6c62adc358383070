//! 通知工作者错误类型
//!
//! 区分服务商配置错误、分发错误和缺少发送方默认值，
//! 便于启动阶段给出明确的失败原因。

use notification_dispatch::NotificationError;
use notification_providers::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("服务商初始化失败: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Dispatch(#[from] NotificationError),

    #[error("未配置默认发送方: {channel}")]
    MissingSender { channel: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkerError::MissingSender { channel: "EMAIL" };
        assert_eq!(err.to_string(), "未配置默认发送方: EMAIL");

        let err = WorkerError::from(ProviderError::MissingField {
            provider: "twilio",
            field: "account_sid",
        });
        assert_eq!(
            err.to_string(),
            "服务商初始化失败: 服务商配置缺失: twilio.account_sid"
        );

        let err = WorkerError::from(NotificationError::PoolShutdown);
        assert_eq!(err.to_string(), "工作池已关闭");
    }
}
