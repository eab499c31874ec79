//! 响应 DTO 定义
//!
//! 所有 REST API 的响应体结构

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Benefit, User, UserRole};

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（无数据）
    pub fn success_empty() -> ApiResponse<()> {
        ApiResponse {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: None,
        }
    }

    /// 创建成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 服务信息
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub app: String,
    pub version: String,
}

/// 用户响应 DTO（不包含密码哈希）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub tipo: UserRole,
    pub ativo: bool,
    pub pontos: i64,
    #[serde(rename = "criadoEm")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nome: user.name,
            email: user.email,
            tipo: user.role,
            ativo: user.active,
            pontos: user.points,
            created_at: user.created_at,
        }
    }
}

/// 登录响应
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub redirect_url: String,
    pub expires_at: i64,
}

/// 积分余额
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub pontos: i64,
}

/// 权益响应 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenefitDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub nome: String,
    pub endereco: String,
    pub pontos: i64,
    pub data: NaiveDate,
    pub quantidade: i64,
}

impl From<Benefit> for BenefitDto {
    fn from(benefit: Benefit) -> Self {
        Self {
            id: benefit.id,
            nome: benefit.name,
            endereco: benefit.address,
            pontos: benefit.points_cost,
            data: benefit.expires_on,
            quantidade: benefit.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dto_hides_password_hash() {
        let user = User {
            id: Uuid::now_v7(),
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            role: UserRole::Cliente,
            active: true,
            points: 200,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(UserDto::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("secret"));
        assert_eq!(json["tipo"], "Cliente");
        assert_eq!(json["pontos"], 200);
        assert!(json.get("_id").is_some());
    }

    #[test]
    fn test_api_response_skips_empty_data() {
        let json = serde_json::to_value(ApiResponse::<()>::success_empty()).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("data").is_none());
    }
}
