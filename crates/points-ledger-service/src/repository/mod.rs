//! 数据库仓储层
//!
//! 封装用户与权益的 SQL 操作，服务层只依赖 trait 接口以便 mock 测试。

mod benefit_repo;
mod traits;
mod user_repo;

pub use benefit_repo::BenefitRepository;
pub use traits::*;
pub use user_repo::UserRepository;
