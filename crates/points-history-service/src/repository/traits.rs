//! 仓储 Trait 定义

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{HistoryPoint, HistoryTransaction, NewHistoryPoint, NewHistoryTransaction};
use crate::range::TimeRange;

/// 用户历史合计（两张表的带符号积分和）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryTotals {
    pub points: i64,
    pub transactions: i64,
}

impl HistoryTotals {
    pub fn total(&self) -> i64 {
        self.points + self.transactions
    }
}

/// 清空结果（删除的行数）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub points_deleted: u64,
    pub transactions_deleted: u64,
}

/// 历史记录仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepositoryTrait: Send + Sync {
    /// 追加积分记录，哈希重复时返回 `DuplicatePoint`
    async fn insert_point(&self, point: &NewHistoryPoint) -> Result<HistoryPoint>;
    async fn insert_transaction(&self, tx: &NewHistoryTransaction) -> Result<HistoryTransaction>;

    async fn list_points(&self, id_user: &str, range: TimeRange) -> Result<Vec<HistoryPoint>>;
    async fn list_transactions(
        &self,
        id_user: &str,
        range: TimeRange,
    ) -> Result<Vec<HistoryTransaction>>;

    async fn point_exists(&self, id: &str) -> Result<bool>;
    async fn totals(&self, id_user: &str) -> Result<HistoryTotals>;

    /// 删除两张表的全部数据
    async fn purge(&self) -> Result<PurgeReport>;
}
