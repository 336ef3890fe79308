//! 划线 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use learning::Highlight;
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, CreateHighlightRequest, NoteFilter, PageResponse};
use crate::error::{ApiError, Result};
use crate::state::AppState;

const HIGHLIGHT_COLUMNS: &str = "id, user_id, content_type, content_id, note_id, text, color, \
    start_offset, end_offset, created_at, updated_at";

/// 分页获取划线，按文中位置排序
///
/// GET /api/highlights?contentType=&contentId=
pub async fn list_highlights(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(filter): Query<NoteFilter>,
) -> Result<Json<ApiResponse<PageResponse<Highlight>>>> {
    let pagination = filter.pagination();

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM highlights
        WHERE user_id = $1
          AND ($2::text IS NULL OR content_type = $2)
          AND ($3::bigint IS NULL OR content_id = $3)
        "#,
    )
    .bind(auth.id)
    .bind(filter.content_type)
    .bind(filter.content_id)
    .fetch_one(&state.pool)
    .await?;

    let sql = format!(
        r#"
        SELECT {} FROM highlights
        WHERE user_id = $1
          AND ($2::text IS NULL OR content_type = $2)
          AND ($3::bigint IS NULL OR content_id = $3)
        ORDER BY content_type ASC, content_id ASC, start_offset ASC, id ASC
        LIMIT $4 OFFSET $5
        "#,
        HIGHLIGHT_COLUMNS
    );
    let highlights = sqlx::query_as::<_, Highlight>(&sql)
        .bind(auth.id)
        .bind(filter.content_type)
        .bind(filter.content_id)
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        highlights,
        total.0,
        pagination.page,
        pagination.limit,
    ))))
}

/// 创建划线，可关联自己的笔记
///
/// POST /api/highlights
pub async fn create_highlight(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateHighlightRequest>,
) -> Result<Json<ApiResponse<Highlight>>> {
    req.validate()?;
    req.check_range()?;

    if let Some(note_id) = req.note_id {
        let owned: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM notes WHERE id = $1 AND user_id = $2)")
                .bind(note_id)
                .bind(auth.id)
                .fetch_one(&state.pool)
                .await?;
        if !owned.0 {
            return Err(ApiError::NoteNotFound(note_id));
        }
    }

    let sql = format!(
        r#"
        INSERT INTO highlights
            (user_id, content_type, content_id, note_id, text, color, start_offset, end_offset)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        HIGHLIGHT_COLUMNS
    );
    let highlight = sqlx::query_as::<_, Highlight>(&sql)
        .bind(auth.id)
        .bind(req.content_type)
        .bind(req.content_id)
        .bind(req.note_id)
        .bind(&req.text)
        .bind(&req.color)
        .bind(req.start_offset)
        .bind(req.end_offset)
        .fetch_one(&state.pool)
        .await?;

    info!(user_id = auth.id, highlight_id = highlight.id, "Highlight created");
    Ok(Json(ApiResponse::success(highlight)))
}

/// 删除划线
///
/// DELETE /api/highlights/{id}
pub async fn delete_highlight(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let result = sqlx::query("DELETE FROM highlights WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::HighlightNotFound(id));
    }

    Ok(Json(ApiResponse::<()>::success_empty()))
}
