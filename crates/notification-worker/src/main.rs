//! 通知工作者
//!
//! 加载配置、初始化可观测性，装配分发器后运行演示流程。

use anyhow::{Context, Result};
use notification_worker::{build_dispatcher, demo};
use notify_shared::config::AppConfig;
use notify_shared::observability;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 加载配置：config/default.toml -> config/{env}.toml -> config/notification-worker.toml -> 环境变量
    let config = AppConfig::load("notification-worker").context("加载配置失败")?;

    // 2. 初始化可观测性
    let _guard = observability::init(&config.observability).await?;

    info!("Starting notification-worker...");
    info!(
        environment = %config.environment,
        pool_size = config.dispatch.worker_pool_size,
        "Configuration loaded"
    );

    // 3. 发送方默认值必须来自配置文件或环境变量
    if let Err(e) = demo::check_senders(&config.defaults) {
        error!(
            error = %e,
            "缺少发送方默认值，请检查 CONFIG_DIR 或设置 NOTIFY_DEFAULTS__EMAIL_SENDER / NOTIFY_DEFAULTS__SMS_SENDER"
        );
        return Err(e.into());
    }

    // 4. 装配分发器
    let dispatcher = build_dispatcher(&config)?;

    // 5. 运行演示，结束时工作池已关闭
    let report = demo::run(&dispatcher, &config).await?;

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "notification-worker finished"
    );

    Ok(())
}
