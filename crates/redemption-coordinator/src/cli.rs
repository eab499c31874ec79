//! 命令行定义与执行

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use rewards_shared::config::AppConfig;
use rewards_shared::retry::RetryPolicy;
use serde_json::Value;

use crate::client::{HistoryClient, LedgerClient};
use crate::coordinator::{CompensationPolicy, RedemptionCoordinator};
use crate::error::{CoordinatorError, Result};
use crate::payload::ScanPayload;

pub const SERVICE_NAME: &str = "redemption-coordinator";

/// 扫码得分、权益兑换与对账
#[derive(Parser, Debug)]
#[command(name = "redeem")]
#[command(version, about = "积分兑换协调器")]
pub struct Cli {
    /// 登录后获得的 JWT
    #[arg(long, env = "REWARDS_TOKEN", hide_env_values = true)]
    pub token: String,

    /// 覆盖配置中的积分账本地址
    #[arg(long)]
    pub ledger_url: Option<String>,

    /// 覆盖配置中的历史记录地址
    #[arg(long)]
    pub history_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 扫描二维码得分，参数为二维码中的 JSON 文本
    Scan { payload: String },

    /// 兑换指定权益
    Benefit { id: String },

    /// 对比当前余额与历史记录合计
    Reconcile,
}

/// 按配置组装协调器
pub fn build_coordinator(config: &AppConfig, cli: &Cli) -> Result<RedemptionCoordinator> {
    let timeout = Duration::from_secs(config.upstream.timeout_seconds);
    let ledger_url = cli
        .ledger_url
        .clone()
        .unwrap_or_else(|| config.upstream.ledger_url.clone());
    let history_url = cli
        .history_url
        .clone()
        .unwrap_or_else(|| config.upstream.history_url.clone());

    let ledger = LedgerClient::new(ledger_url, cli.token.clone(), timeout)?;
    let history = HistoryClient::new(history_url, timeout)?;

    Ok(RedemptionCoordinator::new(Arc::new(ledger), Arc::new(history))
        .with_compensation(CompensationPolicy::from_flag(
            config.coordinator.compensate_on_failure,
        ))
        .with_read_policy(RetryPolicy::with_max_retries(config.coordinator.read_retries))
        .with_opening_balance(config.coordinator.opening_balance))
}

/// 执行子命令，返回要输出的 JSON
pub async fn run(coordinator: &RedemptionCoordinator, command: &Commands) -> Result<Value> {
    let value = match command {
        Commands::Scan { payload } => {
            let payload = ScanPayload::parse(payload)?;
            to_json(coordinator.earn_from_scan(&payload).await?)?
        }
        Commands::Benefit { id } => to_json(coordinator.redeem_benefit(id).await?)?,
        Commands::Reconcile => {
            let report = coordinator.reconcile().await?;
            let consistent = report.is_consistent();
            let mut value = to_json(report)?;
            if let Value::Object(map) = &mut value {
                map.insert("consistent".to_string(), Value::Bool(consistent));
            }
            value
        }
    };
    Ok(value)
}

fn to_json<T: serde::Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| CoordinatorError::InvalidPayload(format!("无法序列化结果: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Balance, MockHistoryApi, MockLedgerApi};

    #[test]
    fn test_parse_scan_command() {
        let cli = Cli::try_parse_from([
            "redeem",
            "--token",
            "abc",
            "scan",
            r#"{"points":10,"hash":"h"}"#,
        ])
        .unwrap();
        assert_eq!(cli.token, "abc");
        assert!(matches!(cli.command, Commands::Scan { ref payload } if payload.contains("hash")));
    }

    #[test]
    fn test_parse_benefit_with_url_override() {
        let cli = Cli::try_parse_from([
            "redeem",
            "--token",
            "abc",
            "--ledger-url",
            "http://ledger:3000/api",
            "benefit",
            "b-1",
        ])
        .unwrap();
        assert_eq!(cli.ledger_url.as_deref(), Some("http://ledger:3000/api"));
        assert!(matches!(cli.command, Commands::Benefit { ref id } if id == "b-1"));
    }

    #[test]
    fn test_build_coordinator_from_config() {
        let cli = Cli::try_parse_from(["redeem", "--token", "abc", "reconcile"]).unwrap();
        assert!(build_coordinator(&AppConfig::default(), &cli).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_scan_payload_fails_before_any_call() {
        let coordinator = RedemptionCoordinator::new(
            Arc::new(MockLedgerApi::new()),
            Arc::new(MockHistoryApi::new()),
        );
        let err = run(
            &coordinator,
            &Commands::Scan {
                payload: r#"{"points":-1,"hash":"h"}"#.to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoordinatorError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_reconcile_output_includes_consistency_flag() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();
        ledger.expect_get_balance().returning(|| {
            Ok(Balance {
                user_id: "u-1".to_string(),
                points: 260,
            })
        });
        history.expect_history_total().returning(|_| Ok(60));

        let coordinator = RedemptionCoordinator::new(Arc::new(ledger), Arc::new(history))
            .with_opening_balance(200);
        let value = run(&coordinator, &Commands::Reconcile).await.unwrap();

        assert_eq!(value["drift"], 0);
        assert_eq!(value["expectedBalance"], 260);
        assert_eq!(value["consistent"], true);
    }
}
