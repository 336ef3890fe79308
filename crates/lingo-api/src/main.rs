//! 语言学习 API 服务
//!
//! 提供账号、单词卡、学习内容、学习进度和推送订阅等 REST API。

use lingo_api::{AppState, build_router};
use lingo_shared::{config::AppConfig, database::Database, observability};
use notification_worker::build_sender;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 从 config/{service_name}.toml 与 LINGO_ 环境变量加载配置
    let config = AppConfig::load("lingo-api")?;
    let _guard = observability::init(&config.service_name, &config.observability).await?;

    // 生产环境拒绝使用默认密钥或通配 CORS 启动
    let violations = config.production_violations();
    if !violations.is_empty() {
        for violation in &violations {
            tracing::error!(violation, "Unsafe production configuration");
        }
        anyhow::bail!("refusing to start with {} unsafe setting(s)", violations.len());
    }
    if config.cron.secret.is_empty() {
        warn!("cron.secret is empty, /api/cron/* endpoints will reject all calls");
    }

    info!(environment = %config.environment, "Starting lingo-api on {}", config.server_addr());

    let db = Database::connect(&config.database).await?;
    if config.database.run_migrations {
        db.run_migrations().await?;
    }

    let sender = build_sender(&config.push)?;
    info!(sender = sender.name(), "Push sender initialized");

    let addr = config.server_addr();
    let state = AppState::new(db.clone(), config, sender);
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    // 收到 SIGTERM 或 Ctrl+C 后停止接收新连接，等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// 监听关闭信号
///
/// 收到任一信号后返回，触发 axum 的优雅关闭流程
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
