//! JWT 会话令牌
//!
//! 令牌既写入 HttpOnly Cookie，也可以通过 Bearer 头携带

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use toyshare_marketplace::{User, UserRole};
use toyshare_shared::config::AuthConfig;

use crate::error::ApiError;

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

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expires_in_secs: config.jwt_expires_secs,
            issuer: config.jwt_issuer.clone(),
        }
    }
}

/// JWT Claims（Token 载荷）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
}

impl Claims {
    /// 解析当前用户 ID
    pub fn user_id(&self) -> Result<i64, ApiError> {
        self.sub
            .parse()
            .map_err(|_| ApiError::Unauthorized("无效的用户 ID".to_string()))
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
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
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户签发会话令牌，返回 (token, 过期时间戳)
    pub fn generate_token(&self, user: &User) -> Result<(String, i64), ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.expires_in_secs);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("JWT 生成失败: {}", e)))?;

        Ok((token, exp.timestamp()))
    }

    /// 验证并解析令牌
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::Unauthorized("会话已过期，请重新登录".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    ApiError::Unauthorized("无效的会话令牌".to_string())
                }
                _ => ApiError::Unauthorized(format!("会话验证失败: {}", e)),
            },
        )?;

        Ok(token_data.claims)
    }

    /// 会话有效期（秒）
    pub fn expires_in_secs(&self) -> i64 {
        self.config.expires_in_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret: "test-secret".to_string(),
            expires_in_secs: 3600,
            issuer: "toyshare".to_string(),
        })
    }

    fn user(role: UserRole) -> User {
        User {
            id: 42,
            username: "lily".to_string(),
            email: "lily@example.com".to_string(),
            password_hash: String::new(),
            display_name: None,
            location: None,
            bio: None,
            avatar_url: None,
            role,
            sustainability_score: 0,
            current_badge: "Newcomer".to_string(),
            toys_shared: 0,
            successful_exchanges: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_verify() {
        let manager = manager();
        let (token, exp) = manager.generate_token(&user(UserRole::User)).unwrap();

        let claims = manager.verify_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.username, "lily");
        assert_eq!(claims.exp, exp);
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_admin_role_round_trips() {
        let manager = manager();
        let (token, _) = manager.generate_token(&user(UserRole::Admin)).unwrap();
        assert!(manager.verify_token(&token).unwrap().is_admin());
    }

    #[test]
    fn test_rejects_foreign_secret_and_issuer() {
        let (token, _) = manager().generate_token(&user(UserRole::User)).unwrap();

        let other_secret = JwtManager::new(JwtConfig {
            secret: "another-secret".to_string(),
            expires_in_secs: 3600,
            issuer: "toyshare".to_string(),
        });
        assert!(matches!(
            other_secret.verify_token(&token),
            Err(ApiError::Unauthorized(_))
        ));

        let other_issuer = JwtManager::new(JwtConfig {
            secret: "test-secret".to_string(),
            expires_in_secs: 3600,
            issuer: "someone-else".to_string(),
        });
        assert!(other_issuer.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new(JwtConfig {
            secret: "test-secret".to_string(),
            // 超出默认 60 秒的时钟容差
            expires_in_secs: -120,
            issuer: "toyshare".to_string(),
        });
        let (token, _) = manager.generate_token(&user(UserRole::User)).unwrap();

        let err = manager.verify_token(&token).unwrap_err();
        assert!(err.to_string().contains("过期"));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(manager().verify_token("not.a.jwt").is_err());
    }
}
