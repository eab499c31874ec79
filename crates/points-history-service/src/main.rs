//! 积分历史记录服务入口

use clap::Parser;
use points_history::{
    MIGRATOR,
    cli::{self, Cli, Commands, SERVICE_NAME},
    repository::HistoryRepository,
};
use rewards_shared::{config::AppConfig, database::Database, observability};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(SERVICE_NAME)?;

    // 一次性命令不启动指标服务
    let command = cli.command.unwrap_or(Commands::Serve);
    if matches!(command, Commands::Purge) {
        config.observability.metrics_enabled = false;
    }

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    let db = Database::connect(&config.database).await?;
    db.run_migrations(&MIGRATOR).await?;

    match command {
        Commands::Serve => {
            info!("Starting {} on {}", SERVICE_NAME, config.server_addr());
            cli::serve(&config, db).await?;
        }
        Commands::Purge => {
            let repo = HistoryRepository::new(db.pool().clone());
            let report = cli::purge(&repo, config.is_production()).await?;
            info!(
                points_deleted = report.points_deleted,
                transactions_deleted = report.transactions_deleted,
                "Purge complete"
            );
            db.close().await;
        }
    }

    Ok(())
}
