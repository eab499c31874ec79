//! 积分账本服务错误类型定义

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// 积分账本服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("禁止访问: {0}")]
    Forbidden(String),
    #[error("邮箱 {0} 未注册")]
    EmailNotRegistered(String),
    #[error("密码错误")]
    InvalidCredentials,
    #[error("当前密码错误")]
    CurrentPasswordMismatch,
    #[error("用户已被停用")]
    UserInactive,

    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("无效的 ID: {0}")]
    InvalidId(String),

    // 资源错误
    #[error("用户不存在: {0}")]
    UserNotFound(String),
    #[error("权益不存在: {0}")]
    BenefitNotFound(String),
    #[error("邮箱 {0} 已存在")]
    EmailAlreadyExists(String),

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl LedgerError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_)
            | Self::InvalidCredentials
            | Self::CurrentPasswordMismatch
            | Self::UserInactive => StatusCode::FORBIDDEN,
            Self::EmailNotRegistered(_) | Self::UserNotFound(_) | Self::BenefitNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Validation(_) | Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::EmailAlreadyExists(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::EmailNotRegistered(_) => "EMAIL_NOT_REGISTERED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::CurrentPasswordMismatch => "CURRENT_PASSWORD_MISMATCH",
            Self::UserInactive => "USER_INACTIVE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidId(_) => "INVALID_ID",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::BenefitNotFound(_) => "BENEFIT_NOT_FOUND",
            Self::EmailAlreadyExists(_) => "EMAIL_ALREADY_EXISTS",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
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

impl From<validator::ValidationErrors> for LedgerError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, LedgerError>;
