//! 请求与响应 DTO
//!
//! 字段命名沿用客户端约定（idUser、points、description）

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{HistoryError, Result};
use crate::models::{HistoryEntry, NewHistoryPoint, NewHistoryTransaction};

fn validate_non_zero(value: i64) -> std::result::Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new("non_zero").with_message("积分不能为 0".into()));
    }
    Ok(())
}

fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("不能为空".into()));
    }
    Ok(())
}

/// 新增积分记录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPointRequest {
    #[validate(
        required(message = "缺少 id"),
        length(max = 128, message = "id 最长 128 个字符"),
        custom(function = "validate_not_blank")
    )]
    pub id: Option<String>,
    #[validate(
        required(message = "缺少 idUser"),
        length(max = 64, message = "idUser 最长 64 个字符"),
        custom(function = "validate_not_blank")
    )]
    pub id_user: Option<String>,
    #[validate(required(message = "缺少 points"), custom(function = "validate_non_zero"))]
    pub points: Option<i64>,
}

impl RecordPointRequest {
    /// 校验并转换为待写入记录
    pub fn into_new(self) -> Result<NewHistoryPoint> {
        self.validate()?;
        match (self.id, self.id_user, self.points) {
            (Some(id), Some(id_user), Some(points)) => Ok(NewHistoryPoint {
                id: id.trim().to_string(),
                id_user: id_user.trim().to_string(),
                points,
            }),
            _ => Err(HistoryError::Validation("缺少必填字段".to_string())),
        }
    }
}

/// 新增交易记录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionRequest {
    #[validate(
        required(message = "缺少 idUser"),
        length(max = 64, message = "idUser 最长 64 个字符"),
        custom(function = "validate_not_blank")
    )]
    pub id_user: Option<String>,
    #[validate(
        required(message = "缺少 description"),
        length(max = 255, message = "description 最长 255 个字符"),
        custom(function = "validate_not_blank")
    )]
    pub description: Option<String>,
    #[validate(required(message = "缺少 points"), custom(function = "validate_non_zero"))]
    pub points: Option<i64>,
}

impl RecordTransactionRequest {
    pub fn into_new(self) -> Result<NewHistoryTransaction> {
        self.validate()?;
        match (self.id_user, self.description, self.points) {
            (Some(id_user), Some(description), Some(points)) => Ok(NewHistoryTransaction {
                id_user: id_user.trim().to_string(),
                description: description.trim().to_string(),
                points,
            }),
            _ => Err(HistoryError::Validation("缺少必填字段".to_string())),
        }
    }
}

/// 历史查询参数
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// 写入成功响应
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordedResponse {
    pub message: String,
    pub id: String,
}

/// 历史列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

/// 积分记录是否存在
#[derive(Debug, Serialize, Deserialize)]
pub struct PointExistsResponse {
    pub id: String,
    pub exists: bool,
}

/// 用户历史合计
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub id_user: String,
    pub points_total: i64,
    pub transactions_total: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_request_valid() {
        let req: RecordPointRequest =
            serde_json::from_str(r#"{"id":"qr-123","idUser":"u-1","points":40}"#).unwrap();
        let new = req.into_new().unwrap();
        assert_eq!(new.id, "qr-123");
        assert_eq!(new.id_user, "u-1");
        assert_eq!(new.points, 40);
    }

    #[test]
    fn test_point_request_missing_fields() {
        let req: RecordPointRequest = serde_json::from_str(r#"{"id":"qr-123"}"#).unwrap();
        assert!(matches!(req.into_new(), Err(HistoryError::Validation(_))));
    }

    #[test]
    fn test_zero_points_rejected() {
        let req: RecordPointRequest =
            serde_json::from_str(r#"{"id":"qr-123","idUser":"u-1","points":0}"#).unwrap();
        assert!(req.into_new().is_err());

        let req: RecordTransactionRequest =
            serde_json::from_str(r#"{"idUser":"u-1","description":"x","points":0}"#).unwrap();
        assert!(req.into_new().is_err());
    }

    #[test]
    fn test_validate_non_zero() {
        assert!(validate_non_zero(0).is_err());
        assert!(validate_non_zero(1).is_ok());
        assert!(validate_non_zero(-1).is_ok());
    }

    #[test]
    fn test_transaction_allows_negative_points() {
        let req: RecordTransactionRequest = serde_json::from_str(
            r#"{"idUser":"u-1","description":"Ingresso cinema","points":-150}"#,
        )
        .unwrap();
        assert_eq!(req.into_new().unwrap().points, -150);
    }

    #[test]
    fn test_blank_description_rejected() {
        let req: RecordTransactionRequest =
            serde_json::from_str(r#"{"idUser":"u-1","description":"   ","points":5}"#).unwrap();
        assert!(req.into_new().is_err());
    }
}
