//! 认证模块
//!
//! 提供 JWT Token 生成、验证和密码处理功能

mod jwt;
mod password;

pub use jwt::{Claims, JwtManager};
pub use password::{hash_password, verify_password};

use crate::error::ApiError;

/// 当前登录用户，由认证中间件注入请求扩展
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: String,
}

impl AuthUser {
    pub fn from_claims(claims: &Claims) -> Result<Self, ApiError> {
        Ok(Self {
            id: claims.user_id()?,
            role: claims.role.clone(),
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// 内容维护类操作仅管理员可用
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("需要管理员权限".to_string()))
        }
    }
}
