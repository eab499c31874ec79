//! 命令行定义与执行
//!
//! `serve` 启动 REST 服务（默认），`purge` 清空全部历史数据。

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use clap::{Parser, Subcommand};
use rewards_shared::{config::AppConfig, database::Database, server};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::HistoryError;
use crate::range::offset_from_hours;
use crate::repository::{HistoryRepository, HistoryRepositoryTrait, PurgeReport};
use crate::routes;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "points-history-service";

/// 积分历史记录服务
#[derive(Parser, Debug)]
#[command(name = "points-history")]
#[command(version, about = "积分历史记录服务")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 启动 HTTP 服务
    Serve,

    /// 删除全部积分与交易历史（用于重置测试数据，生产环境拒绝执行）
    Purge,
}

/// 清空历史数据，生产环境直接拒绝
pub async fn purge(
    repo: &dyn HistoryRepositoryTrait,
    is_production: bool,
) -> Result<PurgeReport, HistoryError> {
    if is_production {
        return Err(HistoryError::PurgeRefused);
    }

    let report = repo.purge().await?;
    warn!(
        points_deleted = report.points_deleted,
        transactions_deleted = report.transactions_deleted,
        "History purged"
    );
    Ok(report)
}

/// 启动 HTTP 服务直到收到关闭信号
pub async fn serve(config: &AppConfig, db: Database) -> anyhow::Result<()> {
    let offset = offset_from_hours(config.history.utc_offset_hours)?;
    let repo = Arc::new(HistoryRepository::new(db.pool().clone()));
    let state = AppState::new(repo, offset);

    let app = Router::new()
        .route(
            "/ready",
            get({
                let db = db.clone();
                move || {
                    let db = db.clone();
                    async move { server::readiness_body(SERVICE_NAME, &db).await }
                }
            }),
        )
        .merge(routes::build_router(state))
        .layer(middleware::from_fn(server::security_headers))
        .layer(server::cors_layer(&config.cors, config.is_production()));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}
