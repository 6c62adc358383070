//! Handler 注册表
//!
//! 按通知类型索引所有 [`NotificationHandler`] 实例，提供统一的查找接口。
//!
//! ## 设计说明
//!
//! 注册表采用 HashMap 存储 Handler 实例，以 NotificationKind 为 key 进行路由。
//! 启动时完成注册，交给分发器后只读，跨线程共享无需加锁。
//!
//! ## 使用示例
//!
//! ```ignore
//! let mut registry = HandlerRegistry::new();
//! registry
//!     .register(Arc::new(EmailHandler::new(email_gateway, renderer.clone())))
//!     .register(Arc::new(SmsHandler::new(sms_gateway, renderer)));
//!
//! let handler = registry.resolve(&notification)?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{NotificationError, Result};
use crate::handlers::NotificationHandler;
use crate::types::{Notification, NotificationKind};

/// Handler 注册表
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<NotificationKind, Arc<dyn NotificationHandler>>,
}

impl HandlerRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// 注册一个 Handler
    ///
    /// 按 `kind()` 索引，同类型已存在的 Handler 会被替换
    pub fn register(&mut self, handler: Arc<dyn NotificationHandler>) -> &mut Self {
        let kind = handler.kind();
        debug!(
            kind = %kind,
            description = handler.description(),
            "注册通知处理器"
        );
        self.handlers.insert(kind, handler);
        self
    }

    /// 按通知的实际类型查找 Handler
    ///
    /// 未注册时返回 `NoHandlerRegistered`，不会静默丢弃通知
    pub fn resolve(&self, notification: &Notification) -> Result<Arc<dyn NotificationHandler>> {
        let kind = notification.kind();
        self.get(kind)
            .ok_or(NotificationError::NoHandlerRegistered { kind })
    }

    /// 获取指定类型的 Handler
    pub fn get(&self, kind: NotificationKind) -> Option<Arc<dyn NotificationHandler>> {
        self.handlers.get(&kind).cloned()
    }

    /// 检查是否已注册指定类型的 Handler
    pub fn contains(&self, kind: NotificationKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// 获取所有已注册的通知类型
    pub fn registered_kinds(&self) -> Vec<NotificationKind> {
        self.handlers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
