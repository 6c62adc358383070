//! 服务商配置错误

use notification_dispatch::NotificationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("服务商配置缺失: {provider}.{field}")]
    MissingField {
        provider: &'static str,
        field: &'static str,
    },

    #[error("服务商配置无效: {provider}.{field} {message}")]
    InvalidField {
        provider: &'static str,
        field: &'static str,
        message: String,
    },
}

impl From<ProviderError> for NotificationError {
    fn from(err: ProviderError) -> Self {
        NotificationError::Config(err.to_string())
    }
}
