//! 用户实体
//!
//! 用户记录持有当前积分余额，余额只由账本服务修改。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum UserRole {
    Admin,
    #[default]
    Cliente,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Cliente => "Cliente",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// 登录后前端跳转页面
    pub fn landing_page(&self) -> &'static str {
        match self {
            Self::Admin => "menu.html",
            Self::Cliente => "menuUser.html",
        }
    }
}

/// 用户记录
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub active: bool,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 待创建的用户
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub points: i64,
}

impl NewUser {
    pub fn new(name: String, email: String, password_hash: String, points: i64) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash,
            role: UserRole::Cliente,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_page_by_role() {
        assert_eq!(UserRole::Admin.landing_page(), "menu.html");
        assert_eq!(UserRole::Cliente.landing_page(), "menuUser.html");
    }

    #[test]
    fn test_role_serde_names() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"Admin\"");
        let role: UserRole = serde_json::from_str("\"Cliente\"").unwrap();
        assert_eq!(role, UserRole::Cliente);
    }

    #[test]
    fn test_new_user_defaults_to_client() {
        let user = NewUser::new("Ana".into(), "ana@x.com".into(), "hash".into(), 200);
        assert_eq!(user.role, UserRole::Cliente);
        assert_eq!(user.points, 200);
    }
}
