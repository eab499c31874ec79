//! 数据传输对象
//!
//! 请求体沿用客户端的字段命名（nome、senha、pontos 等），ID 字段统一为 `_id`

mod request;
mod response;

pub use request::*;
pub use response::*;
