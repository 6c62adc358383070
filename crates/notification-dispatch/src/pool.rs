//! 有界工作池
//!
//! 异步发送与批量发送共用的执行器。任务按提交顺序排队，
//! 同一时刻最多 `size` 个任务在阻塞线程上执行，网关的阻塞调用不会占用异步 runtime。
//!
//! 结构：提交方把任务推入无界队列，单个调度协程按 FIFO 顺序取任务、
//! 先拿到信号量许可，再交给 `spawn_blocking` 执行；许可随任务结束释放。

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use notify_shared::observability::metrics;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{Semaphore, mpsc, oneshot};
use tracing::{debug, info};

use crate::error::{NotificationError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// 有界工作池
pub struct WorkerPool {
    size: usize,
    sender: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    pending: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// 在指定 runtime 上创建工作池
    ///
    /// `size` 为 0 时返回配置错误
    pub fn new(size: usize, runtime: Handle) -> Result<Self> {
        if size == 0 {
            return Err(NotificationError::Config(
                "worker_pool_size 必须大于 0".to_string(),
            ));
        }

        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        let semaphore = Arc::new(Semaphore::new(size));

        runtime.spawn(async move {
            while let Some(job) = receiver.recv().await {
                let Ok(permit) = semaphore.clone().acquire_owned().await else {
                    break;
                };
                tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    job();
                });
            }
            debug!("工作池调度协程退出");
        });

        info!(pool_size = size, "工作池已启动");

        Ok(Self {
            size,
            sender: Mutex::new(Some(sender)),
            pending: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// 在当前 tokio runtime 上创建工作池
    pub fn from_current(size: usize) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            NotificationError::Config(format!("工作池必须在 tokio runtime 内创建: {}", e))
        })?;
        Self::new(size, runtime)
    }

    /// 提交一个阻塞任务
    ///
    /// 立即返回；工作池已关闭时返回的句柄直接解析为 `PoolShutdown`
    pub fn submit<F, T>(&self, task: F) -> TaskHandle<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.sender.lock();
        let Some(sender) = guard.as_ref() else {
            debug!("工作池已关闭，拒绝新任务");
            return TaskHandle::rejected(NotificationError::PoolShutdown);
        };

        let (tx, rx) = oneshot::channel();
        let depth = PendingGuard::new(self.pending.clone());
        let job: Job = Box::new(move || {
            let result = task();
            drop(depth);
            // 接收方已丢弃时结果无人关心
            let _ = tx.send(result);
        });

        if sender.send(job).is_err() {
            return TaskHandle::rejected(NotificationError::PoolShutdown);
        }

        TaskHandle::pending(rx)
    }

    /// 停止接收新任务
    ///
    /// 已提交的任务（执行中或排队中）会继续完成，本方法不等待
    pub fn shutdown(&self) {
        if self.sender.lock().take().is_some() {
            info!(
                pending = self.pending(),
                "工作池关闭，已提交任务将继续执行"
            );
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.sender.lock().is_none()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// 已提交但尚未结束的任务数
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

/// 维护未完成任务计数，任务结束（包括 panic）时递减
struct PendingGuard {
    pending: Arc<AtomicUsize>,
}

impl PendingGuard {
    fn new(pending: Arc<AtomicUsize>) -> Self {
        let depth = pending.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::set_worker_queue_depth(depth);
        Self { pending }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let depth = self.pending.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::set_worker_queue_depth(depth);
    }
}

/// 后台任务句柄
///
/// 作为 Future 等待任务结果。任务 panic 或在执行前被丢弃时解析为 `TaskFailed`
pub struct TaskHandle<T> {
    state: HandleState<T>,
}

enum HandleState<T> {
    Pending(oneshot::Receiver<Result<T>>),
    Rejected(Option<NotificationError>),
}

impl<T> TaskHandle<T> {
    fn pending(receiver: oneshot::Receiver<Result<T>>) -> Self {
        Self {
            state: HandleState::Pending(receiver),
        }
    }

    fn rejected(error: NotificationError) -> Self {
        Self {
            state: HandleState::Rejected(Some(error)),
        }
    }
}

impl<T> Unpin for TaskHandle<T> {}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            HandleState::Pending(receiver) => Pin::new(receiver).poll(cx).map(|received| {
                received.unwrap_or_else(|_| {
                    Err(NotificationError::TaskFailed(
                        "后台任务未返回结果（panic 或被丢弃）".to_string(),
                    ))
                })
            }),
            HandleState::Rejected(error) => Poll::Ready(Err(error
                .take()
                .unwrap_or(NotificationError::PoolShutdown))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_zero_size_is_config_error() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let err = WorkerPool::new(0, runtime.handle().clone()).err().unwrap();
        assert!(matches!(err, NotificationError::Config(_)));
    }

    #[test]
    fn test_from_current_outside_runtime() {
        assert!(matches!(
            WorkerPool::from_current(2),
            Err(NotificationError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_returns_result() {
        let pool = WorkerPool::from_current(2).unwrap();
        let value = pool.submit(|| Ok(21 * 2)).await.unwrap();
        assert_eq!(value, 42);

        let err = pool
            .submit(|| -> Result<()> { Err(NotificationError::gateway("SMS", "down")) })
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::Gateway { .. }));
    }

    #[tokio::test]
    async fn test_concurrency_bounded_by_size() {
        let pool = WorkerPool::from_current(2).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let running = running.clone();
                let peak = peak.clone();
                pool.submit(move || {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(30));
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        let peak = peak.load(Ordering::SeqCst);
        assert!((1..=2).contains(&peak), "峰值并发 {peak} 超出池大小");
        assert_eq!(pool.pending(), 0);
    }

    #[tokio::test]
    async fn test_tasks_start_in_submission_order() {
        let pool = WorkerPool::from_current(1).unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let order = order.clone();
                pool.submit(move || {
                    order.lock().push(i);
                    Ok(i)
                })
            })
            .collect();

        let results = futures::future::try_join_all(handles).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_but_finishes_queued() {
        let pool = WorkerPool::from_current(1).unwrap();

        let queued: Vec<_> = (0..3)
            .map(|i| {
                pool.submit(move || {
                    std::thread::sleep(Duration::from_millis(10));
                    Ok(i)
                })
            })
            .collect();

        pool.shutdown();
        assert!(pool.is_shutdown());

        let rejected = pool.submit(|| Ok(99)).await;
        assert!(matches!(rejected, Err(NotificationError::PoolShutdown)));

        let results = futures::future::try_join_all(queued).await.unwrap();
        assert_eq!(results, vec![0, 1, 2]);

        // 重复关闭无副作用
        pool.shutdown();
    }

    #[tokio::test]
    async fn test_rejected_handle_is_ready_immediately() {
        let pool = WorkerPool::from_current(1).unwrap();
        pool.shutdown();

        let mut handle = tokio_test::task::spawn(pool.submit(|| Ok(())));
        let err = tokio_test::assert_ready_err!(handle.poll());
        assert!(matches!(err, NotificationError::PoolShutdown));
    }

    #[tokio::test]
    async fn test_handle_pending_until_task_finishes() {
        let pool = WorkerPool::from_current(1).unwrap();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

        let mut handle = tokio_test::task::spawn(pool.submit(move || {
            release_rx
                .recv()
                .map_err(|e| NotificationError::TaskFailed(e.to_string()))
        }));
        tokio_test::assert_pending!(handle.poll());
        assert_eq!(pool.pending(), 1);

        release_tx.send(()).unwrap();
        handle.await.unwrap();
        assert_eq!(pool.pending(), 0);
    }

    #[tokio::test]
    async fn test_panicking_task_is_task_failed() {
        let pool = WorkerPool::from_current(1).unwrap();

        let err = pool
            .submit(|| -> Result<()> { panic!("gateway exploded") })
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::TaskFailed(_)));

        // 许可已释放，后续任务正常执行
        assert_eq!(pool.submit(|| Ok("next")).await.unwrap(), "next");
        assert_eq!(pool.pending(), 0);
    }
}
