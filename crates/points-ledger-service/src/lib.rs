//! 积分账本服务
//!
//! 持有用户当前积分余额与权益目录，是余额唯一的写入方。
//!
//! ## 模块结构
//!
//! - `auth`: JWT 签发校验与密码哈希
//! - `dto`: 请求和响应的数据传输对象（沿用客户端的葡语字段名）
//! - `handlers`: HTTP 请求处理器
//! - `middleware`: 认证中间件
//! - `models`: 用户与权益实体
//! - `repository`: PostgreSQL 仓储
//! - `routes`: 路由配置
//! - `state`: 应用状态

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;

pub use error::{LedgerError, Result};
pub use models::{Benefit, NewBenefit, NewUser, User, UserRole};
pub use state::AppState;

/// 编译期嵌入的数据库迁移
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
