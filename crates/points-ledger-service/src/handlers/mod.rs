//! HTTP 请求处理器

pub mod auth;
pub mod benefit;
pub mod points;
pub mod user;
