//! 数据库仓储层

mod history_repo;
mod traits;

pub use history_repo::HistoryRepository;
pub use traits::*;
