//! JWT Token 处理
//!
//! 提供 JWT Token 的生成和验证功能

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use learning::UserRole;
use lingo_shared::config::AuthConfig;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// JWT Claims（Token 载荷）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    pub email: String,
    /// 角色：user / admin
    pub role: String,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, ApiError> {
        self.sub
            .parse()
            .map_err(|_| ApiError::Unauthorized("无效的用户 ID".to_string()))
    }
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    issuer: String,
    expires_in_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            expires_in_secs: config.jwt_expires_secs,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// 生成 JWT Token，返回 (token, 过期时间戳)
    pub fn generate_token(
        &self,
        user_id: i64,
        email: &str,
        role: UserRole,
    ) -> Result<(String, i64), ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("JWT 生成失败: {}", e)))?;

        Ok((token, exp.timestamp()))
    }

    /// 验证并解析 JWT Token
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::Unauthorized("Token 已过期".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    ApiError::Unauthorized("无效的 Token".to_string())
                }
                _ => ApiError::Unauthorized(format!("Token 验证失败: {}", e)),
            },
        )?;

        Ok(token_data.claims)
    }

    /// 基于现有 Claims 生成新 Token（延长过期时间）
    pub fn refresh_token(&self, claims: &Claims) -> Result<(String, i64), ApiError> {
        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(ApiError::Unauthorized)?;
        self.generate_token(claims.user_id()?, &claims.email, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(&AuthConfig::default())
    }

    #[test]
    fn test_generate_and_verify_token() {
        let manager = manager();
        let (token, exp) = manager
            .generate_token(42, "ada@example.com", UserRole::Admin)
            .unwrap();

        let claims = manager.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn test_invalid_token() {
        assert!(manager().verify_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = JwtManager::new(&AuthConfig {
            jwt_secret: "another-secret-of-sufficient-length".to_string(),
            ..Default::default()
        });
        let (token, _) = other.generate_token(1, "a@b.c", UserRole::User).unwrap();
        assert!(manager().verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = JwtManager::new(&AuthConfig {
            jwt_expires_secs: -3600,
            ..Default::default()
        });
        let (token, _) = expired.generate_token(1, "a@b.c", UserRole::User).unwrap();
        let err = expired.verify_token(&token).unwrap_err();
        assert!(err.to_string().contains("过期"));
    }

    #[test]
    fn test_refresh_keeps_identity() {
        let manager = manager();
        let (token, _) = manager.generate_token(7, "u@x.io", UserRole::User).unwrap();
        let claims = manager.verify_token(&token).unwrap();
        let (refreshed, _) = manager.refresh_token(&claims).unwrap();
        let refreshed_claims = manager.verify_token(&refreshed).unwrap();
        assert_eq!(refreshed_claims.sub, "7");
        assert_eq!(refreshed_claims.role, "user");
    }
}
