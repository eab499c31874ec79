//! 积分历史记录服务
//!
//! 只追加的积分获取与消费日志，独立于积分账本数据库。
//! 两类记录合并后按时间倒序返回，日期区间按配置的本地时区解释。

pub mod cli;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod range;
pub mod repository;
pub mod routes;
pub mod state;

pub use error::{HistoryError, Result};
pub use models::{HistoryEntry, HistoryPoint, HistoryTransaction};
pub use state::AppState;

/// 编译期嵌入的数据库迁移
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
