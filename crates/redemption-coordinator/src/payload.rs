//! 二维码内容解析
//!
//! 二维码文本是 JSON：`{"points": <正整数>, "hash": "<唯一标识>"}`

use serde::Deserialize;

use crate::error::{CoordinatorError, Result};

/// 哈希最大长度，与历史记录表主键一致
pub const MAX_HASH_LEN: usize = 128;

/// 扫描得到的积分凭证
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPayload {
    pub points: i64,
    pub hash: String,
}

#[derive(Deserialize)]
struct RawPayload {
    points: Option<i64>,
    hash: Option<String>,
}

impl ScanPayload {
    /// 解析并校验二维码文本
    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawPayload = serde_json::from_str(text.trim())
            .map_err(|e| CoordinatorError::InvalidPayload(format!("不是有效的 JSON: {e}")))?;

        let points = raw
            .points
            .ok_or_else(|| CoordinatorError::InvalidPayload("缺少 points".to_string()))?;
        if points <= 0 {
            return Err(CoordinatorError::InvalidPayload(format!(
                "points 必须为正数: {points}"
            )));
        }

        let hash = raw.hash.map(|h| h.trim().to_string()).unwrap_or_default();
        if hash.is_empty() {
            return Err(CoordinatorError::InvalidPayload("缺少 hash".to_string()));
        }
        if hash.chars().count() > MAX_HASH_LEN {
            return Err(CoordinatorError::InvalidPayload(format!(
                "hash 超过 {MAX_HASH_LEN} 个字符"
            )));
        }

        Ok(Self { points, hash })
    }
}
