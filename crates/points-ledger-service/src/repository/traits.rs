//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于处理器依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Benefit, NewBenefit, NewUser, User};

/// 用户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// 创建用户，邮箱重复时返回 `EmailAlreadyExists`
    async fn create(&self, user: &NewUser) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// 按姓名排序列出全部用户
    async fn list(&self) -> Result<Vec<User>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;

    // 余额
    async fn set_points(&self, id: Uuid, points: i64) -> Result<bool>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool>;
}

/// 权益仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BenefitRepositoryTrait: Send + Sync {
    async fn create(&self, benefit: &NewBenefit) -> Result<Benefit>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Benefit>>;
    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<Benefit>>;
    /// 列出积分成本在 [min, max] 区间内的权益
    async fn list_by_cost_range(
        &self,
        min: Option<i64>,
        max: Option<i64>,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<Benefit>>;
    /// 名称模糊搜索（不区分大小写）
    async fn search_by_name(&self, filter: &str) -> Result<Vec<Benefit>>;
    async fn update(&self, id: Uuid, benefit: &NewBenefit) -> Result<bool>;

    // 库存
    async fn set_quantity(&self, id: Uuid, quantity: i64) -> Result<bool>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}
