//! 认证相关的 HTTP 处理器
//!
//! 提供注册、登录、获取当前用户和刷新 Token 的 API

use axum::{Extension, Json, extract::State};
use learning::repository::UserRepositoryTrait;
use learning::{NewUser, User};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{AuthUser, Claims, hash_password, verify_password};
use crate::dto::{ApiResponse, AuthResponse, LoginRequest, RefreshResponse, RegisterRequest};
use crate::error::{ApiError, Result};
use crate::state::AppState;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn issue_token(state: &AppState, user: User) -> Result<AuthResponse> {
    let (token, expires_at) = state
        .jwt_manager
        .generate_token(user.id, &user.email, user.role)?;
    Ok(AuthResponse {
        token,
        expires_at,
        user,
    })
}

/// 用户注册
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>> {
    req.validate()?;

    let email = normalize_email(&req.email);
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(ApiError::EmailTaken);
    }

    let new_user = NewUser {
        email,
        password_hash: hash_password(&req.password)?,
        name: req.name.trim().to_string(),
        native_language: req.native_language,
        target_language: req.target_language,
        level: req.level,
    };

    // 并发注册时由唯一约束兜底
    let user = state.user_repo.create(&new_user).await.map_err(|e| {
        match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::EmailTaken,
            other => other,
        }
    })?;

    info!(user_id = user.id, "User registered");

    Ok(Json(ApiResponse::success(issue_token(&state, user)?)))
}

/// 用户登录
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>> {
    req.validate()?;

    let email = normalize_email(&req.email);
    let user = state
        .user_repo
        .find_by_email(&email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = user.id, "User logged in");

    Ok(Json(ApiResponse::success(issue_token(&state, user)?)))
}

/// 获取当前用户
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<User>>> {
    let user = state
        .user_repo
        .find_by_id(auth.id)
        .await?
        .ok_or(ApiError::UserNotFound(auth.id))?;

    Ok(Json(ApiResponse::success(user)))
}

/// 刷新 Token
///
/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<RefreshResponse>>> {
    let (token, expires_at) = state.jwt_manager.refresh_token(&claims)?;
    Ok(Json(ApiResponse::success(RefreshResponse { token, expires_at })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
