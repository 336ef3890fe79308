//! 卡片与复习 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use learning::repository::CardRepositoryTrait;
use learning::service::TrackInput;
use learning::{ActivityType, Card, CardUpdate};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, DueCardsQuery, ReviewCardRequest, UpdateCardRequest};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 获取到期待复习的卡片
///
/// GET /api/cards/due
pub async fn list_due_cards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<DueCardsQuery>,
) -> Result<Json<ApiResponse<Vec<Card>>>> {
    let cards = state.review_service.due_cards(auth.id, query.limit).await?;
    Ok(Json(ApiResponse::success(cards)))
}

/// 获取卡片详情
///
/// GET /api/cards/{id}
pub async fn get_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Card>>> {
    let card = state
        .card_repo
        .get_card(auth.id, id)
        .await?
        .ok_or(ApiError::CardNotFound(id))?;
    Ok(Json(ApiResponse::success(card)))
}

/// 更新卡片内容
///
/// PATCH /api/cards/{id}
pub async fn update_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCardRequest>,
) -> Result<Json<ApiResponse<Card>>> {
    req.validate()?;

    let update = CardUpdate {
        front: req.front.map(|f| f.trim().to_string()),
        back: req.back,
        example: req.example,
    };
    let card = state
        .card_repo
        .update_card(auth.id, id, &update)
        .await?
        .ok_or(ApiError::CardNotFound(id))?;

    Ok(Json(ApiResponse::success(card)))
}

/// 删除卡片
///
/// DELETE /api/cards/{id}
pub async fn delete_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.card_repo.delete_card(auth.id, id).await? {
        return Err(ApiError::CardNotFound(id));
    }
    info!(user_id = auth.id, card_id = id, "Card deleted");
    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 提交复习结果
///
/// POST /api/cards/{id}/review
///
/// 记得则升一个盒子，忘记则回到盒子 0；同时计入今日的复习活动
pub async fn review_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<ReviewCardRequest>,
) -> Result<Json<ApiResponse<Card>>> {
    let card = state
        .review_service
        .review_card(auth.id, id, req.remembered)
        .await?;

    let track = TrackInput {
        activity_type: ActivityType::Review,
        content_type: None,
        content_id: None,
        duration_seconds: 0,
    };
    if let Err(e) = state.activity_service.track(auth.id, track).await {
        warn!(user_id = auth.id, card_id = id, error = %e, "Failed to track review activity");
    }

    Ok(Json(ApiResponse::success(card)))
}
