//! 笔记 API 处理器
//!
//! 笔记通过 (contentType, contentId) 关联到视频、剧集、播客或文章，只对作者可见

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use learning::Note;
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{
    ApiResponse, CreateNoteRequest, NoteFilter, PageResponse, UpdateNoteRequest,
};
use crate::error::{ApiError, Result};
use crate::state::AppState;

const NOTE_COLUMNS: &str =
    "id, user_id, content_type, content_id, title, body, created_at, updated_at";

/// 分页获取笔记
///
/// GET /api/notes?contentType=&contentId=
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(filter): Query<NoteFilter>,
) -> Result<Json<ApiResponse<PageResponse<Note>>>> {
    let pagination = filter.pagination();

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM notes
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
        SELECT {} FROM notes
        WHERE user_id = $1
          AND ($2::text IS NULL OR content_type = $2)
          AND ($3::bigint IS NULL OR content_id = $3)
        ORDER BY updated_at DESC, id DESC
        LIMIT $4 OFFSET $5
        "#,
        NOTE_COLUMNS
    );
    let notes = sqlx::query_as::<_, Note>(&sql)
        .bind(auth.id)
        .bind(filter.content_type)
        .bind(filter.content_id)
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        notes,
        total.0,
        pagination.page,
        pagination.limit,
    ))))
}

/// 创建笔记
///
/// POST /api/notes
pub async fn create_note(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<Json<ApiResponse<Note>>> {
    req.validate()?;

    let sql = format!(
        r#"
        INSERT INTO notes (user_id, content_type, content_id, title, body)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        NOTE_COLUMNS
    );
    let note = sqlx::query_as::<_, Note>(&sql)
        .bind(auth.id)
        .bind(req.content_type)
        .bind(req.content_id)
        .bind(&req.title)
        .bind(&req.body)
        .fetch_one(&state.pool)
        .await?;

    info!(
        user_id = auth.id,
        note_id = note.id,
        content_type = ?note.content_type,
        content_id = note.content_id,
        "Note created"
    );
    Ok(Json(ApiResponse::success(note)))
}

/// 获取笔记详情
///
/// GET /api/notes/{id}
pub async fn get_note(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Note>>> {
    let sql = format!(
        "SELECT {} FROM notes WHERE id = $1 AND user_id = $2",
        NOTE_COLUMNS
    );
    let note = sqlx::query_as::<_, Note>(&sql)
        .bind(id)
        .bind(auth.id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::NoteNotFound(id))?;

    Ok(Json(ApiResponse::success(note)))
}

/// 更新笔记
///
/// PATCH /api/notes/{id}
pub async fn update_note(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<ApiResponse<Note>>> {
    req.validate()?;

    let sql = format!(
        r#"
        UPDATE notes SET
            title = COALESCE($3, title),
            body = COALESCE($4, body),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING {}
        "#,
        NOTE_COLUMNS
    );
    let note = sqlx::query_as::<_, Note>(&sql)
        .bind(id)
        .bind(auth.id)
        .bind(&req.title)
        .bind(&req.body)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::NoteNotFound(id))?;

    Ok(Json(ApiResponse::success(note)))
}

/// 删除笔记，关联的划线保留但解除关联
///
/// DELETE /api/notes/{id}
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NoteNotFound(id));
    }

    info!(user_id = auth.id, note_id = id, "Note deleted");
    Ok(Json(ApiResponse::<()>::success_empty()))
}
