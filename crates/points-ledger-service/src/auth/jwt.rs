//! JWT Token 处理
//!
//! 提供 JWT Token 的生成和验证功能

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rewards_shared::config::AuthConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;
use crate::models::{User, UserRole};

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// 签名密钥
    pub secret: String,
    /// Token 过期时间（秒）
    pub expires_in_secs: i64,
    /// Token 签发者
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        AuthConfig::default().into()
    }
}

impl From<AuthConfig> for JwtConfig {
    fn from(config: AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret,
            expires_in_secs: config.jwt_expires_secs,
            issuer: config.issuer,
        }
    }
}

/// JWT Claims（Token 载荷）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    /// 用户角色
    pub role: UserRole,
    pub email: String,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
}

impl Claims {
    /// 解析 Token 中的用户 ID
    pub fn user_id(&self) -> Result<Uuid, LedgerError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| LedgerError::Unauthorized("Token 中的用户 ID 无效".to_string()))
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// 要求当前用户为管理员
    pub fn require_admin(&self) -> Result<(), LedgerError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(LedgerError::Forbidden("需要管理员权限".to_string()))
        }
    }
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// 创建 JWT 管理器
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户签发 Token，返回 (token, 过期时间戳)
    pub fn generate_token(&self, user: &User) -> Result<(String, i64), LedgerError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.expires_in_secs);

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| LedgerError::Internal(format!("JWT 生成失败: {}", e)))?;

        Ok((token, exp.timestamp()))
    }

    /// 验证并解析 JWT Token
    ///
    /// 返回解析后的 Claims，如果 Token 无效或过期则返回错误
    pub fn verify_token(&self, token: &str) -> Result<Claims, LedgerError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    LedgerError::Unauthorized("Token 已过期".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    LedgerError::Unauthorized("无效的 Token".to_string())
                }
                _ => LedgerError::Unauthorized(format!("Token 验证失败: {}", e)),
            },
        )?;

        Ok(token_data.claims)
    }

    /// 获取 Token 过期时间（秒）
    pub fn expires_in_secs(&self) -> i64 {
        self.config.expires_in_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: UserRole) -> User {
        User {
            id: Uuid::now_v7(),
            name: "Maria Silva".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            active: true,
            points: 200,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_verify_token() {
        let manager = JwtManager::new(JwtConfig::default());
        let user = sample_user(UserRole::Cliente);

        let (token, exp) = manager.generate_token(&user).unwrap();
        assert!(exp > Utc::now().timestamp());

        let claims = manager.verify_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.role, UserRole::Cliente);
        assert_eq!(claims.email, "maria@example.com");
        assert!(claims.require_admin().is_err());
    }

    #[test]
    fn test_admin_claims() {
        let manager = JwtManager::new(JwtConfig::default());
        let (token, _) = manager.generate_token(&sample_user(UserRole::Admin)).unwrap();
        let claims = manager.verify_token(&token).unwrap();
        assert!(claims.require_admin().is_ok());
    }

    #[test]
    fn test_invalid_token() {
        let manager = JwtManager::new(JwtConfig::default());
        let result = manager.verify_token("invalid.token.here");
        assert!(matches!(result, Err(LedgerError::Unauthorized(_))));
    }

    #[test]
    fn test_token_from_other_issuer_rejected() {
        let issuer_a = JwtManager::new(JwtConfig {
            issuer: "someone-else".to_string(),
            ..JwtConfig::default()
        });
        let issuer_b = JwtManager::new(JwtConfig::default());

        let (token, _) = issuer_a.generate_token(&sample_user(UserRole::Admin)).unwrap();
        assert!(issuer_b.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new(JwtConfig {
            expires_in_secs: -600,
            ..JwtConfig::default()
        });
        let (token, _) = manager.generate_token(&sample_user(UserRole::Cliente)).unwrap();

        match manager.verify_token(&token) {
            Err(LedgerError::Unauthorized(msg)) => assert!(msg.contains("过期")),
            other => panic!("期望过期错误，实际: {:?}", other.map(|c| c.sub)),
        }
    }
}
