//! 用户资料处理器

use axum::{Extension, Json, extract::State};
use learning::repository::UserRepositoryTrait;
use learning::{User, UserProfileUpdate};
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, UpdateProfileRequest};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 更新个人资料（含复习提醒开关）
///
/// PATCH /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>> {
    req.validate()?;

    let update = UserProfileUpdate {
        name: req.name.map(|n| n.trim().to_string()),
        native_language: req.native_language,
        target_language: req.target_language,
        level: req.level,
        reminder_enabled: req.reminder_enabled,
    };

    let user = state
        .user_repo
        .update_profile(auth.id, &update)
        .await?
        .ok_or(ApiError::UserNotFound(auth.id))?;

    info!(user_id = user.id, reminder_enabled = user.reminder_enabled, "Profile updated");

    Ok(Json(ApiResponse::success(user)))
}
