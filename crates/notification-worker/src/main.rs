//! 通知工作者
//!
//! 按配置的 cron 表达式执行复习提醒和每日学习汇总任务。

use std::sync::Arc;

use learning::{
    ActivityRepository, NotificationLogRepository, PushSubscriptionRepository, UserRepository,
};
use lingo_shared::{config::AppConfig, database::Database, observability};
use notification_worker::{DailyActivityJob, ReviewReminderJob, Scheduler, build_sender};
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load("notification-worker")?;
    let _guard = observability::init(&config.service_name, &config.observability).await?;

    info!(environment = %config.environment, "Starting notification-worker...");

    let db = Database::connect(&config.database).await?;
    if config.database.run_migrations {
        db.run_migrations().await?;
    }
    let pool = db.pool().clone();

    let sender = build_sender(&config.push)?;
    info!(sender = sender.name(), "Push sender initialized");

    let activity_repo = Arc::new(ActivityRepository::new(pool.clone()));
    let review_reminder = Arc::new(ReviewReminderJob::new(
        Arc::new(UserRepository::new(pool.clone())),
        Arc::new(PushSubscriptionRepository::new(pool.clone())),
        Arc::new(NotificationLogRepository::new(pool.clone())),
        activity_repo.clone(),
        sender,
    ));
    let daily_activity = Arc::new(DailyActivityJob::new(activity_repo));

    let mut scheduler = Scheduler::new();
    scheduler.add(&config.cron.review_reminder_schedule, review_reminder)?;
    scheduler.add(&config.cron.daily_activity_schedule, daily_activity)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handles = scheduler.start(shutdown_rx);
    info!(jobs = handles.len(), "Scheduler started");

    shutdown_signal().await;
    let _ = shutdown_tx.send(true);
    futures::future::join_all(handles).await;

    db.close().await;
    info!("notification-worker shutdown complete");
    Ok(())
}

/// 监听关闭信号
///
/// 收到 SIGTERM 或 Ctrl+C 后返回，由调用方通知各任务退出
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
