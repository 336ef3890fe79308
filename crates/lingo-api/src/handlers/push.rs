//! Web Push 订阅处理器

use axum::{Extension, Json, extract::State};
use learning::repository::PushSubscriptionRepositoryTrait;
use learning::{NewPushSubscription, PushSubscription};
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, SubscribeRequest, UnsubscribeRequest, VapidPublicKeyResponse};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 浏览器订阅时使用的 VAPID 公钥（无需登录）
///
/// GET /api/push/vapid-public-key
pub async fn vapid_public_key(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<VapidPublicKeyResponse>>> {
    let public_key = state.config.push.vapid_public_key.trim();
    if public_key.is_empty() {
        return Err(ApiError::NotFound("推送服务未配置 VAPID 公钥".to_string()));
    }

    Ok(Json(ApiResponse::success(VapidPublicKeyResponse {
        public_key: public_key.to_string(),
    })))
}

/// 保存推送订阅，同一 endpoint 重复订阅时更新密钥并转移到当前用户
///
/// POST /api/push/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<ApiResponse<PushSubscription>>> {
    req.validate()?;
    req.check_keys()?;

    let subscription = state
        .push_repo
        .upsert(&NewPushSubscription {
            user_id: auth.id,
            endpoint: req.endpoint,
            p256dh: req.keys.p256dh,
            auth: req.keys.auth,
            user_agent: req.user_agent,
        })
        .await?;

    info!(user_id = auth.id, subscription_id = subscription.id, "Push subscription saved");
    Ok(Json(ApiResponse::success(subscription)))
}

/// 取消推送订阅
///
/// DELETE /api/push/subscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<UnsubscribeRequest>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.push_repo.delete_for_user(auth.id, &req.endpoint).await? {
        return Err(ApiError::NotFound("推送订阅不存在".to_string()));
    }

    info!(user_id = auth.id, "Push subscription removed");
    Ok(Json(ApiResponse::<()>::success_empty()))
}
