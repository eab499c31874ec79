//! 历史记录实体
//!
//! 两类记录都只追加，不修改也不单条删除。

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// 积分获取记录（主键为二维码哈希）
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct HistoryPoint {
    pub id: String,
    pub id_user: String,
    pub points: i64,
    pub recorded_at: DateTime<Utc>,
}

/// 积分交易记录
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct HistoryTransaction {
    pub id: i64,
    pub id_user: String,
    pub description: String,
    pub points: i64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewHistoryPoint {
    pub id: String,
    pub id_user: String,
    pub points: i64,
}

#[derive(Debug, Clone)]
pub struct NewHistoryTransaction {
    pub id_user: String,
    pub description: String,
    pub points: i64,
}

/// 合并后的历史条目，按 `tipo` 区分来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo")]
pub enum HistoryEntry {
    #[serde(rename = "ponto")]
    Point {
        id: String,
        points: i64,
        date: DateTime<FixedOffset>,
    },
    #[serde(rename = "transacao")]
    Transaction {
        id: i64,
        description: String,
        points: i64,
        date: DateTime<FixedOffset>,
    },
}

impl HistoryEntry {
    pub fn date(&self) -> DateTime<FixedOffset> {
        match self {
            Self::Point { date, .. } | Self::Transaction { date, .. } => *date,
        }
    }

    pub fn points(&self) -> i64 {
        match self {
            Self::Point { points, .. } | Self::Transaction { points, .. } => *points,
        }
    }

    pub fn from_point(point: HistoryPoint, offset: FixedOffset) -> Self {
        Self::Point {
            id: point.id,
            points: point.points,
            date: point.recorded_at.with_timezone(&offset),
        }
    }

    pub fn from_transaction(tx: HistoryTransaction, offset: FixedOffset) -> Self {
        Self::Transaction {
            id: tx.id,
            description: tx.description,
            points: tx.points,
            date: tx.recorded_at.with_timezone(&offset),
        }
    }
}

/// 合并两类记录并按时间倒序排列
pub fn merge_history(
    points: Vec<HistoryPoint>,
    transactions: Vec<HistoryTransaction>,
    offset: FixedOffset,
) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = points
        .into_iter()
        .map(|p| HistoryEntry::from_point(p, offset))
        .chain(
            transactions
                .into_iter()
                .map(|t| HistoryEntry::from_transaction(t, offset)),
        )
        .collect();

    entries.sort_by(|a, b| b.date().cmp(&a.date()));
    entries
}
