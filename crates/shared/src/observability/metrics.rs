//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。
//! 未安装 recorder 时，下面的记录函数都是空操作。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// 全局 Prometheus handle，用于渲染指标
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics 资源守卫
///
/// drop 时停止指标 HTTP 服务
pub struct MetricsHandle {
    server_handle: tokio::task::JoinHandle<()>,
}

impl Drop for MetricsHandle {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    let _ = PROMETHEUS_HANDLE.set(handle.clone());

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle { server_handle })
}

/// 注册通知相关指标的描述
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!(
        "notifications_sent_total",
        "Total number of notifications handed to a channel gateway"
    );
    metrics::describe_histogram!(
        "notification_send_duration_seconds",
        "Channel handler duration in seconds, gateway call included"
    );
    metrics::describe_counter!(
        "notification_dispatch_errors_total",
        "Total number of dispatch errors by error code"
    );
    metrics::describe_gauge!(
        "notification_worker_queue_depth",
        "Async send tasks submitted to the worker pool and not finished yet"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

/// 获取全局 Prometheus handle（用于自定义渲染）
pub fn get_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录一次渠道发送
///
/// `status` 为 success / failure，网关异常不走这里，见 [`record_dispatch_error`]
#[inline]
pub fn record_notification_sent(channel: &str, status: &str, duration_secs: f64) {
    metrics::counter!(
        "notifications_sent_total",
        "channel" => channel.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "notification_send_duration_seconds",
        "channel" => channel.to_string()
    )
    .record(duration_secs);
}

/// 记录分发错误
#[inline]
pub fn record_dispatch_error(code: &str) {
    metrics::counter!(
        "notification_dispatch_errors_total",
        "code" => code.to_string()
    )
    .increment(1);
}

/// 更新工作池中未完成的任务数
#[inline]
pub fn set_worker_queue_depth(depth: usize) {
    metrics::gauge!("notification_worker_queue_depth").set(depth as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_absent_before_init() {
        // 单元测试不会安装全局 recorder
        assert!(get_handle().is_none());
    }
}
