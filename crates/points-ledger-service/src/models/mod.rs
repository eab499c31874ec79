//! 领域模型定义

mod benefit;
mod user;

pub use benefit::{Benefit, NewBenefit};
pub use user::{NewUser, User, UserRole};
