//! 通知分发器
//!
//! 对外的统一入口：按通知类型找到 Handler，支持同步发送、异步发送和批量发送。
//!
//! ## 使用示例
//!
//! ```ignore
//! let dispatcher = NotificationDispatcher::new(registry, WorkerPool::from_current(4)?);
//!
//! // 同步发送，在调用方线程执行
//! let result = dispatcher.send(&notification)?;
//!
//! // 异步发送，交给工作池
//! let result = dispatcher.send_async(notification).await?;
//!
//! // 批量发送，全部成功才返回结果列表
//! let results = dispatcher.send_batch_async(notifications).await?;
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use notify_shared::config::DispatchConfig;
use notify_shared::observability::metrics;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::pool::{TaskHandle, WorkerPool};
use crate::registry::HandlerRegistry;
use crate::types::{Notification, NotificationResult};

/// 单条异步发送的句柄
pub type SendHandle = TaskHandle<NotificationResult>;

/// 批量发送句柄
///
/// 按输入顺序返回结果；任一条出错时解析为首个观察到的错误，不返回部分结果。
/// 需要逐条结果时使用 [`NotificationDispatcher::send_each_async`]。
pub struct BatchHandle {
    inner: BoxFuture<'static, Result<Vec<NotificationResult>>>,
}

impl Future for BatchHandle {
    type Output = Result<Vec<NotificationResult>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

/// 通知分发器
///
/// 持有只读的注册表和自己的工作池
pub struct NotificationDispatcher {
    registry: Arc<HandlerRegistry>,
    pool: WorkerPool,
}

impl NotificationDispatcher {
    pub fn new(registry: HandlerRegistry, pool: WorkerPool) -> Self {
        info!(
            handler_count = registry.len(),
            kinds = ?registry.registered_kinds(),
            pool_size = pool.size(),
            "通知分发器初始化完成"
        );
        Self {
            registry: Arc::new(registry),
            pool,
        }
    }

    /// 按配置在当前 tokio runtime 上创建工作池
    pub fn with_config(registry: HandlerRegistry, config: &DispatchConfig) -> Result<Self> {
        let pool = WorkerPool::from_current(config.worker_pool_size)?;
        Ok(Self::new(registry, pool))
    }

    /// 同步发送
    ///
    /// 在调用方线程上完成路由和网关调用，错误原样返回
    #[instrument(
        skip(self, notification),
        fields(kind = %notification.kind(), recipient = %notification.recipient())
    )]
    pub fn send(&self, notification: &Notification) -> Result<NotificationResult> {
        dispatch(&self.registry, notification)
    }

    /// 异步发送
    ///
    /// 立即返回句柄，实际发送在工作池中执行
    pub fn send_async(&self, notification: Notification) -> SendHandle {
        let registry = Arc::clone(&self.registry);
        self.pool
            .submit(move || dispatch(&registry, &notification))
    }

    /// 批量异步发送（全部成功或整体失败）
    #[instrument(skip(self, notifications), fields(batch_size = notifications.len()))]
    pub fn send_batch_async(&self, notifications: Vec<Notification>) -> BatchHandle {
        let handles = self.send_each_async(notifications);
        BatchHandle {
            inner: futures::future::try_join_all(handles).boxed(),
        }
    }

    /// 批量异步发送，每条通知一个独立句柄
    pub fn send_each_async(&self, notifications: Vec<Notification>) -> Vec<SendHandle> {
        notifications
            .into_iter()
            .map(|notification| self.send_async(notification))
            .collect()
    }

    /// 停止接收新的异步任务，已提交的任务继续完成
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    pub fn is_shutdown(&self) -> bool {
        self.pool.is_shutdown()
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }
}

/// 路由并发送一条通知
fn dispatch(registry: &HandlerRegistry, notification: &Notification) -> Result<NotificationResult> {
    let outcome = registry
        .resolve(notification)
        .and_then(|handler| handler.send(notification));

    if let Err(e) = &outcome {
        warn!(
            kind = %notification.kind(),
            recipient = %notification.recipient(),
            code = e.code(),
            error = %e,
            "通知分发失败"
        );
        metrics::record_dispatch_error(e.code());
    }

    outcome
}
