//! 学习进度 API 处理器

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use learning::service::{TodayProgress, TrackInput};
use learning::{ActivityService, ActivityRepository, DailyActivity};
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, HistoryQuery, StreakResponse, TrackActivityRequest};
use crate::error::Result;
use crate::state::AppState;

/// 历史查询的默认天数
const DEFAULT_HISTORY_DAYS: i64 = 7;

/// 记录一次学习行为，返回更新后的今日汇总
///
/// POST /api/activity/track
pub async fn track_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<TrackActivityRequest>,
) -> Result<Json<ApiResponse<DailyActivity>>> {
    req.validate()?;
    let activity_type = req.resolve_activity_type()?;

    let daily = state
        .activity_service
        .track(
            auth.id,
            TrackInput {
                activity_type,
                content_type: req.content_type,
                content_id: req.content_id,
                duration_seconds: req.duration_seconds.unwrap_or(0),
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(daily)))
}

/// 今日进度
///
/// GET /api/activity/today
pub async fn today(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<TodayProgress>>> {
    let progress = state.activity_service.today_progress(auth.id).await?;
    Ok(Json(ApiResponse::success(progress)))
}

/// 最近 N 天的每日汇总
///
/// GET /api/activity/history?days=
pub async fn history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<DailyActivity>>>> {
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    let rows = state.activity_service.history(auth.id, days).await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// 连续学习天数
///
/// GET /api/activity/streak
pub async fn streak(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<StreakResponse>>> {
    let days = state.activity_service.streak(auth.id).await?;
    Ok(Json(ApiResponse::success(StreakResponse {
        days,
        today: ActivityService::<ActivityRepository>::today(),
    })))
}
