//! 通知分发错误类型
//!
//! 投递失败（服务商拒收、号码无效等）属于正常业务结果，通过
//! [`NotificationResult::failure`](crate::types::NotificationResult::failure) 返回；
//! 这里只定义构造、路由、网关基础设施和工作池层面的错误。

use thiserror::Error;

use crate::types::NotificationKind;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("参数无效: {field} {message}")]
    InvalidArgument { field: String, message: String },

    #[error("未注册通知处理器: {kind}")]
    NoHandlerRegistered { kind: NotificationKind },

    #[error("通知处理器类型不匹配: 期望={expected}, 实际={actual}")]
    HandlerMismatch {
        expected: NotificationKind,
        actual: NotificationKind,
    },

    #[error("渠道网关异常: 渠道={channel}, 原因={message}")]
    Gateway { channel: String, message: String },

    #[error("后台发送任务失败: {0}")]
    TaskFailed(String),

    #[error("工作池已关闭")]
    PoolShutdown,

    #[error("配置错误: {0}")]
    Config(String),
}

impl NotificationError {
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn gateway(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Gateway {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// 稳定的错误码，用于日志和指标标签
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::NoHandlerRegistered { .. } => "NO_HANDLER_REGISTERED",
            Self::HandlerMismatch { .. } => "HANDLER_MISMATCH",
            Self::Gateway { .. } => "GATEWAY_ERROR",
            Self::TaskFailed(_) => "TASK_FAILED",
            Self::PoolShutdown => "POOL_SHUTDOWN",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// 是否值得调用方重试
    ///
    /// 只有网关异常可能是瞬时故障，其余都是调用方或装配问题
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }
}

pub type Result<T> = std::result::Result<T, NotificationError>;
