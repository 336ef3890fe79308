//! 通知记录处理器
//!
//! 推送不携带内容，Service Worker 收到推送后通过 `latest` 拉取展示文案

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use learning::NotificationLog;
use learning::repository::NotificationLogRepositoryTrait;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, PageResponse, PaginationParams};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 分页获取通知记录
///
/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<NotificationLog>>>> {
    let pagination = params.pagination();
    let (items, total) = state
        .notification_repo
        .list_for_user(auth.id, pagination)
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        items,
        total,
        pagination.page,
        pagination.limit,
    ))))
}

/// 最近一条通知，没有时 data 为 null
///
/// GET /api/notifications/latest
pub async fn latest_notification(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Option<NotificationLog>>>> {
    let latest = state.notification_repo.latest_for_user(auth.id).await?;
    Ok(Json(ApiResponse::success(latest)))
}

/// 标记通知为已读
///
/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<NotificationLog>>> {
    let log = state
        .notification_repo
        .mark_read(auth.id, id)
        .await?
        .ok_or(ApiError::NotificationNotFound(id))?;
    Ok(Json(ApiResponse::success(log)))
}
