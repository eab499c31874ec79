//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use rewards_shared::config::LedgerConfig;
use sqlx::PgPool;

use crate::auth::{JwtConfig, JwtManager};
use crate::repository::{
    BenefitRepository, BenefitRepositoryTrait, UserRepository, UserRepositoryTrait,
};

/// Axum 应用共享状态
///
/// 仓储以 trait object 持有，测试时可替换为 mock 实现
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepositoryTrait>,
    pub benefits: Arc<dyn BenefitRepositoryTrait>,
    /// JWT 管理器
    pub jwt_manager: Arc<JwtManager>,
    pub ledger: LedgerConfig,
}

impl AppState {
    /// 基于数据库连接池创建应用状态
    pub fn new(pool: PgPool, jwt_config: JwtConfig, ledger: LedgerConfig) -> Self {
        Self::with_repositories(
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(BenefitRepository::new(pool)),
            jwt_config,
            ledger,
        )
    }

    /// 使用指定的仓储实现创建应用状态
    pub fn with_repositories(
        users: Arc<dyn UserRepositoryTrait>,
        benefits: Arc<dyn BenefitRepositoryTrait>,
        jwt_config: JwtConfig,
        ledger: LedgerConfig,
    ) -> Self {
        Self {
            users,
            benefits,
            jwt_manager: Arc::new(JwtManager::new(jwt_config)),
            ledger,
        }
    }
}
