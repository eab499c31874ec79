//! 兑换协调器
//!
//! 通过顺序 HTTP 调用把扫码得分与权益兑换同时写入积分账本和历史记录，
//! 并提供余额与历史合计的对账。

pub mod cli;
pub mod client;
pub mod coordinator;
pub mod error;
pub mod payload;

pub use coordinator::{
    CompensationPolicy, ReconcileReport, RedemptionCoordinator, RedemptionReceipt, ScanReceipt,
};
pub use error::{CoordinatorError, FlowStep, Result};
pub use payload::ScanPayload;
