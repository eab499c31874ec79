//! 兑换协调器命令行入口

use clap::Parser;
use redemption_coordinator::cli::{self, Cli, SERVICE_NAME};
use rewards_shared::{config::AppConfig, observability};
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(SERVICE_NAME)?;

    // 一次性命令不启动指标服务，标准输出只留给结果
    config.observability.metrics_enabled = false;
    config.observability.log_to_stderr = true;
    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    let coordinator = cli::build_coordinator(&config, &cli)?;

    match cli::run(&coordinator, &cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    }
}
