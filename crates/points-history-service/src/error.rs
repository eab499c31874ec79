//! 历史记录服务错误类型定义

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// 历史记录服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("参数验证失败: {0}")]
    Validation(String),

    #[error("积分记录 {0} 已存在")]
    DuplicatePoint(String),

    #[error("生产环境禁止清空历史数据")]
    PurgeRefused,

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl HistoryError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::DuplicatePoint(_) => StatusCode::CONFLICT,
            Self::PurgeRefused => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicatePoint(_) => "DUPLICATE_POINT",
            Self::PurgeRefused => "PURGE_REFUSED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for HistoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for HistoryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_codes() {
        let cases = vec![
            (HistoryError::Validation("points".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (HistoryError::DuplicatePoint("abc".into()), StatusCode::CONFLICT, "DUPLICATE_POINT"),
            (HistoryError::PurgeRefused, StatusCode::FORBIDDEN, "PURGE_REFUSED"),
            (HistoryError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.error_code(), code);
        }
    }

    #[tokio::test]
    async fn test_duplicate_response_mentions_hash() {
        let response = HistoryError::DuplicatePoint("qr-hash-1".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].as_str().unwrap().contains("qr-hash-1"));
    }
}
