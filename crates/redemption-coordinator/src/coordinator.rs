//! 兑换协调器
//!
//! 把一次扫码或权益兑换拆成对两个独立服务的顺序 HTTP 调用。
//! 两个存储之间不存在原子事务，失败时按补偿策略尽量回滚已写入的部分。
//!
//! ## 扫码得分流程
//!
//! 1. 查询历史中是否已有该哈希 -> 2. 读取当前余额 -> 3. 写入新余额
//! 4. 追加积分历史（失败时恢复原余额）
//!
//! ## 权益兑换流程
//!
//! 1. 读取余额与权益 -> 2. 校验库存与余额 -> 3. 扣减余额
//! 4. 扣减库存（失败时恢复余额）-> 5. 追加交易历史（失败时恢复余额与库存）
//!
//! 读操作遇到瞬时故障会按退避策略重试，写操作从不重试。

use std::sync::Arc;

use rewards_shared::observability::metrics;
use rewards_shared::retry::{RetryPolicy, retry_with_policy};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::client::{Balance, BenefitSnapshot, HistoryApi, LedgerApi};
use crate::error::{CoordinatorError, FlowStep, Result};
use crate::payload::ScanPayload;

const FLOW_SCAN: &str = "earn_from_scan";
const FLOW_REDEEM: &str = "redeem_benefit";

/// 部分失败时的补偿策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompensationPolicy {
    /// 写回写入前的余额（兑换时同时恢复库存）
    #[default]
    RestoreBalance,
    /// 保持现状，只报告失败
    None,
}

impl CompensationPolicy {
    pub fn from_flag(compensate: bool) -> Self {
        if compensate {
            Self::RestoreBalance
        } else {
            Self::None
        }
    }
}

/// 扫码得分结果
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanReceipt {
    pub user_id: String,
    pub previous_balance: i64,
    pub new_balance: i64,
    pub points_credited: i64,
    pub hash: String,
}

/// 权益兑换结果
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionReceipt {
    pub user_id: String,
    pub benefit_id: String,
    pub benefit_name: String,
    pub points_spent: i64,
    pub new_balance: i64,
    pub remaining_quantity: i64,
}

/// 对账报告
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub user_id: String,
    pub balance: i64,
    pub history_total: i64,
    pub opening_balance: i64,
    pub expected_balance: i64,
    pub drift: i64,
}

impl ReconcileReport {
    pub fn new(user_id: String, balance: i64, history_total: i64, opening_balance: i64) -> Self {
        let expected_balance = opening_balance + history_total;
        Self {
            user_id,
            balance,
            history_total,
            opening_balance,
            expected_balance,
            drift: balance - expected_balance,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.drift == 0
    }
}

/// 兑换协调器
pub struct RedemptionCoordinator {
    ledger: Arc<dyn LedgerApi>,
    history: Arc<dyn HistoryApi>,
    compensation: CompensationPolicy,
    read_policy: RetryPolicy,
    opening_balance: i64,
}

impl RedemptionCoordinator {
    pub fn new(ledger: Arc<dyn LedgerApi>, history: Arc<dyn HistoryApi>) -> Self {
        Self {
            ledger,
            history,
            compensation: CompensationPolicy::default(),
            read_policy: RetryPolicy::default(),
            opening_balance: 0,
        }
    }

    pub fn with_compensation(mut self, compensation: CompensationPolicy) -> Self {
        self.compensation = compensation;
        self
    }

    pub fn with_read_policy(mut self, policy: RetryPolicy) -> Self {
        self.read_policy = policy;
        self
    }

    /// 新用户注册时的初始积分，对账时作为期初余额
    pub fn with_opening_balance(mut self, opening_balance: i64) -> Self {
        self.opening_balance = opening_balance;
        self
    }

    /// 扫码得分
    #[instrument(skip(self, payload), fields(hash = %payload.hash, points = payload.points))]
    pub async fn earn_from_scan(&self, payload: &ScanPayload) -> Result<ScanReceipt> {
        let exists = self
            .read("history.point_exists", || {
                self.history.point_exists(&payload.hash)
            })
            .await?;
        if exists {
            warn!("Scanned code already recorded");
            return Err(CoordinatorError::DuplicateScan(payload.hash.clone()));
        }

        let balance = self.read_balance().await?;
        let new_balance = balance.points.checked_add(payload.points).ok_or_else(|| {
            CoordinatorError::InvalidPayload(format!("points 溢出: {}", payload.points))
        })?;

        self.ledger.set_balance(new_balance).await?;

        if let Err(err) = self
            .history
            .record_point(&payload.hash, &balance.user_id, payload.points)
            .await
        {
            let mut failures = Vec::new();
            if self.compensation == CompensationPolicy::RestoreBalance {
                failures.extend(self.restore_balance(balance.points).await);
            }
            return Err(self.partial_failure(FLOW_SCAN, FlowStep::AppendHistory, err, failures));
        }

        metrics::record_points_credited("scan", payload.points);
        info!(
            user_id = %balance.user_id,
            previous = balance.points,
            new_balance,
            "Points credited from scan"
        );

        Ok(ScanReceipt {
            user_id: balance.user_id,
            previous_balance: balance.points,
            new_balance,
            points_credited: payload.points,
            hash: payload.hash.clone(),
        })
    }

    /// 兑换权益
    #[instrument(skip(self))]
    pub async fn redeem_benefit(&self, benefit_id: &str) -> Result<RedemptionReceipt> {
        let (balance, benefit) = tokio::try_join!(
            self.read_balance(),
            self.read("ledger.get_benefit", || self.ledger.get_benefit(benefit_id)),
        )?;

        if benefit.quantity <= 0 {
            metrics::record_benefit_redemption("rejected");
            return Err(CoordinatorError::OutOfStock(benefit.id));
        }
        if balance.points < benefit.cost {
            metrics::record_benefit_redemption("rejected");
            return Err(CoordinatorError::InsufficientPoints {
                required: benefit.cost,
                available: balance.points,
            });
        }

        let new_balance = balance.points - benefit.cost;
        let remaining_quantity = benefit.quantity - 1;

        // 零成本权益不改动余额，也不产生交易记录
        let charges_points = benefit.cost > 0;

        if charges_points {
            if let Err(err) = self.ledger.set_balance(new_balance).await {
                metrics::record_benefit_redemption("failed");
                return Err(err);
            }
        }

        if let Err(err) = self
            .ledger
            .set_benefit_quantity(&benefit.id, remaining_quantity)
            .await
        {
            metrics::record_benefit_redemption("failed");
            if !charges_points {
                return Err(err);
            }
            let mut failures = Vec::new();
            if self.compensation == CompensationPolicy::RestoreBalance {
                failures.extend(self.restore_balance(balance.points).await);
            }
            return Err(self.partial_failure(FLOW_REDEEM, FlowStep::WriteQuantity, err, failures));
        }

        if charges_points {
            if let Err(err) = self
                .history
                .record_transaction(&balance.user_id, &benefit.name, -benefit.cost)
                .await
            {
                let mut failures = Vec::new();
                if self.compensation == CompensationPolicy::RestoreBalance {
                    failures.extend(self.restore_balance(balance.points).await);
                    failures.extend(self.restore_quantity(&benefit).await);
                }
                metrics::record_benefit_redemption("failed");
                return Err(self.partial_failure(
                    FLOW_REDEEM,
                    FlowStep::AppendHistory,
                    err,
                    failures,
                ));
            }
        }

        metrics::record_benefit_redemption("completed");
        info!(
            user_id = %balance.user_id,
            benefit_id = %benefit.id,
            cost = benefit.cost,
            new_balance,
            remaining_quantity,
            "Benefit redeemed"
        );

        Ok(RedemptionReceipt {
            user_id: balance.user_id,
            benefit_id: benefit.id,
            benefit_name: benefit.name,
            points_spent: benefit.cost,
            new_balance,
            remaining_quantity,
        })
    }

    /// 对比当前余额与历史合计
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<ReconcileReport> {
        let balance = self.read_balance().await?;
        let history_total = self
            .read("history.history_total", || {
                self.history.history_total(&balance.user_id)
            })
            .await?;

        let report = ReconcileReport::new(
            balance.user_id,
            balance.points,
            history_total,
            self.opening_balance,
        );
        if report.is_consistent() {
            info!(user_id = %report.user_id, "Balance consistent with history");
        } else {
            warn!(
                user_id = %report.user_id,
                balance = report.balance,
                expected = report.expected_balance,
                drift = report.drift,
                "Balance drift detected"
            );
        }
        Ok(report)
    }

    async fn read_balance(&self) -> Result<Balance> {
        self.read("ledger.get_balance", || self.ledger.get_balance())
            .await
    }

    async fn read<T, F, Fut>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        retry_with_policy(
            &self.read_policy,
            operation_name,
            CoordinatorError::is_retryable,
            operation,
        )
        .await
    }

    async fn restore_balance(&self, previous: i64) -> Option<String> {
        match self.ledger.set_balance(previous).await {
            Ok(_) => {
                info!(balance = previous, "Balance restored");
                None
            }
            Err(e) => {
                error!(balance = previous, error = %e, "Failed to restore balance");
                Some(format!("恢复余额失败: {e}"))
            }
        }
    }

    async fn restore_quantity(&self, benefit: &BenefitSnapshot) -> Option<String> {
        match self
            .ledger
            .set_benefit_quantity(&benefit.id, benefit.quantity)
            .await
        {
            Ok(_) => {
                info!(benefit_id = %benefit.id, quantity = benefit.quantity, "Benefit quantity restored");
                None
            }
            Err(e) => {
                error!(benefit_id = %benefit.id, error = %e, "Failed to restore benefit quantity");
                Some(format!("恢复库存失败: {e}"))
            }
        }
    }

    fn partial_failure(
        &self,
        flow: &'static str,
        step: FlowStep,
        source: CoordinatorError,
        compensation_failures: Vec<String>,
    ) -> CoordinatorError {
        let compensated = self.compensation == CompensationPolicy::RestoreBalance
            && compensation_failures.is_empty();
        let compensation_error = if compensation_failures.is_empty() {
            None
        } else {
            Some(compensation_failures.join("; "))
        };

        metrics::record_partial_failure(flow, step.as_str(), compensated);
        error!(
            flow,
            step = step.as_str(),
            compensated,
            compensation_error = compensation_error.as_deref(),
            error = %source,
            "Partial failure"
        );

        CoordinatorError::PartialFailure {
            flow,
            step,
            compensated,
            compensation_error,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockall::Sequence;
    use mockall::predicate::eq;

    use super::*;
    use crate::client::{MockHistoryApi, MockLedgerApi};

    fn fast_retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            multiplier: 1.0,
        }
    }

    fn coordinator(ledger: MockLedgerApi, history: MockHistoryApi) -> RedemptionCoordinator {
        RedemptionCoordinator::new(Arc::new(ledger), Arc::new(history))
            .with_read_policy(fast_retry(2))
            .with_opening_balance(200)
    }

    fn balance(points: i64) -> Balance {
        Balance {
            user_id: "u-1".to_string(),
            points,
        }
    }

    fn benefit(cost: i64, quantity: i64) -> BenefitSnapshot {
        BenefitSnapshot {
            id: "b-1".to_string(),
            name: "Ingresso cinema".to_string(),
            cost,
            quantity,
        }
    }

    fn server_error(service: &'static str) -> CoordinatorError {
        CoordinatorError::Upstream {
            service,
            status: 500,
            code: Some("DATABASE_ERROR".to_string()),
            message: "服务内部错误，请稍后重试".to_string(),
        }
    }

    fn payload(points: i64) -> ScanPayload {
        ScanPayload {
            points,
            hash: "qr-abc".to_string(),
        }
    }

    #[tokio::test]
    async fn test_scan_credits_balance_and_records_history() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();
        let mut seq = Sequence::new();

        history
            .expect_point_exists()
            .with(eq("qr-abc"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        ledger
            .expect_get_balance()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(balance(200)));
        ledger
            .expect_set_balance()
            .with(eq(250))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|p| Ok(balance(p)));
        history
            .expect_record_point()
            .with(eq("qr-abc"), eq("u-1"), eq(50))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let receipt = coordinator(ledger, history)
            .earn_from_scan(&payload(50))
            .await
            .unwrap();

        assert_eq!(receipt.previous_balance, 200);
        assert_eq!(receipt.new_balance, 250);
        assert_eq!(receipt.points_credited, 50);
        assert_eq!(receipt.hash, "qr-abc");
    }

    #[tokio::test]
    async fn test_scan_refuses_duplicate_hash() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();
        history.expect_point_exists().returning(|_| Ok(true));
        ledger.expect_get_balance().never();
        ledger.expect_set_balance().never();

        let err = coordinator(ledger, history)
            .earn_from_scan(&payload(50))
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::DuplicateScan(h) if h == "qr-abc"));
    }

    #[tokio::test]
    async fn test_scan_history_failure_restores_balance() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();
        let mut seq = Sequence::new();

        history.expect_point_exists().returning(|_| Ok(false));
        ledger.expect_get_balance().returning(|| Ok(balance(100)));
        ledger
            .expect_set_balance()
            .with(eq(130))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|p| Ok(balance(p)));
        ledger
            .expect_set_balance()
            .with(eq(100))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|p| Ok(balance(p)));
        history
            .expect_record_point()
            .times(1)
            .returning(|_, _, _| Err(server_error("points-history")));

        let err = coordinator(ledger, history)
            .earn_from_scan(&payload(30))
            .await
            .unwrap_err();

        match err {
            CoordinatorError::PartialFailure {
                flow,
                step,
                compensated,
                compensation_error,
                ..
            } => {
                assert_eq!(flow, "earn_from_scan");
                assert_eq!(step, FlowStep::AppendHistory);
                assert!(compensated);
                assert!(compensation_error.is_none());
            }
            other => panic!("期望 PartialFailure，实际: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scan_without_compensation_leaves_balance() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();

        history.expect_point_exists().returning(|_| Ok(false));
        ledger.expect_get_balance().returning(|| Ok(balance(100)));
        ledger
            .expect_set_balance()
            .with(eq(130))
            .times(1)
            .returning(|p| Ok(balance(p)));
        history
            .expect_record_point()
            .returning(|_, _, _| Err(server_error("points-history")));

        let err = coordinator(ledger, history)
            .with_compensation(CompensationPolicy::None)
            .earn_from_scan(&payload(30))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoordinatorError::PartialFailure { compensated: false, compensation_error: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_scan_reports_failed_compensation() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();

        history.expect_point_exists().returning(|_| Ok(false));
        ledger.expect_get_balance().returning(|| Ok(balance(100)));
        ledger
            .expect_set_balance()
            .with(eq(130))
            .returning(|p| Ok(balance(p)));
        ledger
            .expect_set_balance()
            .with(eq(100))
            .returning(|_| {
                Err(CoordinatorError::Transport {
                    service: "points-ledger",
                    message: "connection refused".to_string(),
                })
            });
        history
            .expect_record_point()
            .returning(|_, _, _| Err(server_error("points-history")));

        let err = coordinator(ledger, history)
            .earn_from_scan(&payload(30))
            .await
            .unwrap_err();

        match err {
            CoordinatorError::PartialFailure {
                compensated,
                compensation_error,
                ..
            } => {
                assert!(!compensated);
                assert!(compensation_error.unwrap().contains("connection refused"));
            }
            other => panic!("期望 PartialFailure，实际: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_balance_read_is_retried_on_server_error() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();
        let mut seq = Sequence::new();

        history.expect_point_exists().returning(|_| Ok(false));
        ledger
            .expect_get_balance()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|| Err(server_error("points-ledger")));
        ledger
            .expect_get_balance()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(balance(10)));
        ledger.expect_set_balance().returning(|p| Ok(balance(p)));
        history.expect_record_point().returning(|_, _, _| Ok(()));

        let receipt = coordinator(ledger, history)
            .earn_from_scan(&payload(5))
            .await
            .unwrap();
        assert_eq!(receipt.new_balance, 15);
    }

    #[tokio::test]
    async fn test_balance_write_is_not_retried() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();

        history.expect_point_exists().returning(|_| Ok(false));
        ledger.expect_get_balance().returning(|| Ok(balance(10)));
        ledger
            .expect_set_balance()
            .times(1)
            .returning(|_| Err(server_error("points-ledger")));
        history.expect_record_point().never();

        let err = coordinator(ledger, history)
            .earn_from_scan(&payload(5))
            .await
            .unwrap_err();
        assert_eq!(err.upstream_status(), Some(500));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let mut ledger = MockLedgerApi::new();
        let history = MockHistoryApi::new();
        ledger.expect_get_balance().times(1).returning(|| {
            Err(CoordinatorError::Upstream {
                service: "points-ledger",
                status: 401,
                code: Some("UNAUTHORIZED".to_string()),
                message: "token expired".to_string(),
            })
        });

        let err = coordinator(ledger, history).reconcile().await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(401));
    }

    #[tokio::test]
    async fn test_redeem_debits_balance_and_quantity() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();

        ledger.expect_get_balance().returning(|| Ok(balance(300)));
        ledger
            .expect_get_benefit()
            .with(eq("b-1"))
            .returning(|_| Ok(benefit(120, 4)));
        ledger
            .expect_set_balance()
            .with(eq(180))
            .times(1)
            .returning(|p| Ok(balance(p)));
        ledger
            .expect_set_benefit_quantity()
            .with(eq("b-1"), eq(3))
            .times(1)
            .returning(|_, q| Ok(benefit(120, q)));
        history
            .expect_record_transaction()
            .with(eq("u-1"), eq("Ingresso cinema"), eq(-120))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let receipt = coordinator(ledger, history)
            .redeem_benefit("b-1")
            .await
            .unwrap();

        assert_eq!(receipt.points_spent, 120);
        assert_eq!(receipt.new_balance, 180);
        assert_eq!(receipt.remaining_quantity, 3);
        assert_eq!(receipt.benefit_name, "Ingresso cinema");
    }

    #[tokio::test]
    async fn test_redeem_rejects_insufficient_points() {
        let mut ledger = MockLedgerApi::new();
        let history = MockHistoryApi::new();
        ledger.expect_get_balance().returning(|| Ok(balance(50)));
        ledger.expect_get_benefit().returning(|_| Ok(benefit(120, 4)));
        ledger.expect_set_balance().never();
        ledger.expect_set_benefit_quantity().never();

        let err = coordinator(ledger, history)
            .redeem_benefit("b-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoordinatorError::InsufficientPoints { required: 120, available: 50 }
        ));
    }

    #[tokio::test]
    async fn test_redeem_rejects_out_of_stock() {
        let mut ledger = MockLedgerApi::new();
        let history = MockHistoryApi::new();
        ledger.expect_get_balance().returning(|| Ok(balance(500)));
        ledger.expect_get_benefit().returning(|_| Ok(benefit(120, 0)));
        ledger.expect_set_balance().never();

        let err = coordinator(ledger, history)
            .redeem_benefit("b-1")
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::OutOfStock(id) if id == "b-1"));
    }

    #[tokio::test]
    async fn test_redeem_quantity_failure_restores_balance() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();
        let mut seq = Sequence::new();

        ledger.expect_get_balance().returning(|| Ok(balance(300)));
        ledger.expect_get_benefit().returning(|_| Ok(benefit(120, 4)));
        ledger
            .expect_set_balance()
            .with(eq(180))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|p| Ok(balance(p)));
        ledger
            .expect_set_benefit_quantity()
            .times(1)
            .returning(|_, _| Err(server_error("points-ledger")));
        ledger
            .expect_set_balance()
            .with(eq(300))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|p| Ok(balance(p)));
        history.expect_record_transaction().never();

        let err = coordinator(ledger, history)
            .redeem_benefit("b-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoordinatorError::PartialFailure {
                step: FlowStep::WriteQuantity,
                compensated: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_redeem_history_failure_restores_balance_and_quantity() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();

        ledger.expect_get_balance().returning(|| Ok(balance(300)));
        ledger.expect_get_benefit().returning(|_| Ok(benefit(120, 4)));
        ledger
            .expect_set_balance()
            .with(eq(180))
            .times(1)
            .returning(|p| Ok(balance(p)));
        ledger
            .expect_set_balance()
            .with(eq(300))
            .times(1)
            .returning(|p| Ok(balance(p)));
        ledger
            .expect_set_benefit_quantity()
            .with(eq("b-1"), eq(3))
            .times(1)
            .returning(|_, q| Ok(benefit(120, q)));
        ledger
            .expect_set_benefit_quantity()
            .with(eq("b-1"), eq(4))
            .times(1)
            .returning(|_, q| Ok(benefit(120, q)));
        history
            .expect_record_transaction()
            .returning(|_, _, _| Err(server_error("points-history")));

        let err = coordinator(ledger, history)
            .redeem_benefit("b-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoordinatorError::PartialFailure {
                flow: "redeem_benefit",
                step: FlowStep::AppendHistory,
                compensated: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_redeem_free_benefit_only_touches_quantity() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();

        ledger.expect_get_balance().returning(|| Ok(balance(0)));
        ledger.expect_get_benefit().returning(|_| Ok(benefit(0, 1)));
        ledger.expect_set_balance().never();
        ledger
            .expect_set_benefit_quantity()
            .with(eq("b-1"), eq(0))
            .returning(|_, q| Ok(benefit(0, q)));
        history.expect_record_transaction().never();

        let receipt = coordinator(ledger, history)
            .redeem_benefit("b-1")
            .await
            .unwrap();
        assert_eq!(receipt.new_balance, 0);
        assert_eq!(receipt.remaining_quantity, 0);
    }

    #[tokio::test]
    async fn test_reconcile_reports_drift() {
        let mut ledger = MockLedgerApi::new();
        let mut history = MockHistoryApi::new();
        ledger.expect_get_balance().returning(|| Ok(balance(330)));
        history
            .expect_history_total()
            .with(eq("u-1"))
            .returning(|_| Ok(100));

        let report = coordinator(ledger, history).reconcile().await.unwrap();
        assert_eq!(report.expected_balance, 300);
        assert_eq!(report.drift, 30);
        assert!(!report.is_consistent());
    }

    #[test]
    fn test_reconcile_report_arithmetic() {
        let report = ReconcileReport::new("u-1".into(), 80, -120, 200);
        assert_eq!(report.expected_balance, 80);
        assert_eq!(report.drift, 0);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_compensation_policy_from_flag() {
        assert_eq!(CompensationPolicy::from_flag(true), CompensationPolicy::RestoreBalance);
        assert_eq!(CompensationPolicy::from_flag(false), CompensationPolicy::None);
    }
}
