//! 应用状态定义

use std::sync::Arc;

use chrono::FixedOffset;

use crate::repository::HistoryRepositoryTrait;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn HistoryRepositoryTrait>,
    /// 日期区间与返回时间使用的本地时区
    pub offset: FixedOffset,
}

impl AppState {
    pub fn new(repo: Arc<dyn HistoryRepositoryTrait>, offset: FixedOffset) -> Self {
        Self { repo, offset }
    }
}
