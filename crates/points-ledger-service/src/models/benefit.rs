//! 权益实体
//!
//! 兑换时扣减可用数量，数量不会小于 0。

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// 权益记录
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Benefit {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub points_cost: i64,
    pub expires_on: NaiveDate,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Benefit {
    /// 是否还有可兑换数量
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// 待写入的权益字段
#[derive(Debug, Clone, PartialEq)]
pub struct NewBenefit {
    pub name: String,
    pub address: String,
    pub points_cost: i64,
    pub expires_on: NaiveDate,
    pub quantity: i64,
}
