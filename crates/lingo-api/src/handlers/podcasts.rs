//! 播客 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use learning::{Podcast, PodcastVocabulary};
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{
    ApiResponse, ContentFilter, CreatePodcastRequest, CreateVocabularyRequest, PageResponse,
    UpdatePodcastRequest,
};
use crate::error::{ApiError, Result};
use crate::state::AppState;

const PODCAST_COLUMNS: &str = "id, title, description, audio_url, cover_url, language, level, \
    duration_seconds, transcript, published, created_at, updated_at";

const VOCABULARY_COLUMNS: &str = "id, podcast_id, word, translation, definition, example, \
    timestamp_ms, created_at, updated_at";

async fn fetch_podcast(state: &AppState, auth: &AuthUser, id: i64) -> Result<Podcast> {
    let sql = format!(
        "SELECT {} FROM podcasts WHERE id = $1 AND ($2 OR published)",
        PODCAST_COLUMNS
    );
    sqlx::query_as::<_, Podcast>(&sql)
        .bind(id)
        .bind(auth.is_admin())
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::PodcastNotFound(id))
}

/// 分页获取播客列表
///
/// GET /api/podcasts?language=&level=
pub async fn list_podcasts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(filter): Query<ContentFilter>,
) -> Result<Json<ApiResponse<PageResponse<Podcast>>>> {
    let pagination = filter.pagination();

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM podcasts
        WHERE ($1::text IS NULL OR language = $1)
          AND ($2::text IS NULL OR level = $2)
          AND ($3 OR published)
        "#,
    )
    .bind(&filter.language)
    .bind(&filter.level)
    .bind(auth.is_admin())
    .fetch_one(&state.pool)
    .await?;

    let sql = format!(
        r#"
        SELECT {} FROM podcasts
        WHERE ($1::text IS NULL OR language = $1)
          AND ($2::text IS NULL OR level = $2)
          AND ($3 OR published)
        ORDER BY created_at DESC, id DESC
        LIMIT $4 OFFSET $5
        "#,
        PODCAST_COLUMNS
    );
    let podcasts = sqlx::query_as::<_, Podcast>(&sql)
        .bind(&filter.language)
        .bind(&filter.level)
        .bind(auth.is_admin())
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        podcasts,
        total.0,
        pagination.page,
        pagination.limit,
    ))))
}

/// 创建播客
///
/// POST /api/podcasts
pub async fn create_podcast(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreatePodcastRequest>,
) -> Result<Json<ApiResponse<Podcast>>> {
    auth.require_admin()?;
    req.validate()?;

    let sql = format!(
        r#"
        INSERT INTO podcasts (title, description, audio_url, cover_url, language, level,
                              duration_seconds, transcript, published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {}
        "#,
        PODCAST_COLUMNS
    );
    let podcast = sqlx::query_as::<_, Podcast>(&sql)
        .bind(req.title.trim())
        .bind(&req.description)
        .bind(&req.audio_url)
        .bind(&req.cover_url)
        .bind(&req.language)
        .bind(&req.level)
        .bind(req.duration_seconds)
        .bind(&req.transcript)
        .bind(req.published.unwrap_or(true))
        .fetch_one(&state.pool)
        .await?;

    info!(podcast_id = podcast.id, title = %podcast.title, "Podcast created");
    Ok(Json(ApiResponse::success(podcast)))
}

/// 获取播客详情
///
/// GET /api/podcasts/{id}
pub async fn get_podcast(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Podcast>>> {
    let podcast = fetch_podcast(&state, &auth, id).await?;
    Ok(Json(ApiResponse::success(podcast)))
}

/// 更新播客
///
/// PATCH /api/podcasts/{id}
pub async fn update_podcast(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePodcastRequest>,
) -> Result<Json<ApiResponse<Podcast>>> {
    auth.require_admin()?;
    req.validate()?;

    let sql = format!(
        r#"
        UPDATE podcasts SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            audio_url = COALESCE($4, audio_url),
            cover_url = COALESCE($5, cover_url),
            language = COALESCE($6, language),
            level = COALESCE($7, level),
            duration_seconds = COALESCE($8, duration_seconds),
            transcript = COALESCE($9, transcript),
            published = COALESCE($10, published),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        PODCAST_COLUMNS
    );
    let podcast = sqlx::query_as::<_, Podcast>(&sql)
        .bind(id)
        .bind(req.title.as_deref().map(str::trim))
        .bind(&req.description)
        .bind(&req.audio_url)
        .bind(&req.cover_url)
        .bind(&req.language)
        .bind(&req.level)
        .bind(req.duration_seconds)
        .bind(&req.transcript)
        .bind(req.published)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::PodcastNotFound(id))?;

    info!(podcast_id = id, "Podcast updated");
    Ok(Json(ApiResponse::success(podcast)))
}

/// 删除播客
///
/// DELETE /api/podcasts/{id}
pub async fn delete_podcast(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    auth.require_admin()?;

    let result = sqlx::query("DELETE FROM podcasts WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::PodcastNotFound(id));
    }

    info!(podcast_id = id, "Podcast deleted");
    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 获取播客词汇
///
/// GET /api/podcasts/{id}/vocabulary
pub async fn list_vocabulary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<PodcastVocabulary>>>> {
    fetch_podcast(&state, &auth, id).await?;

    let sql = format!(
        r#"
        SELECT {} FROM podcast_vocabulary
        WHERE podcast_id = $1
        ORDER BY timestamp_ms ASC NULLS LAST, id ASC
        "#,
        VOCABULARY_COLUMNS
    );
    let rows = sqlx::query_as::<_, PodcastVocabulary>(&sql)
        .bind(id)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(rows)))
}

/// 添加播客词汇
///
/// POST /api/podcasts/{id}/vocabulary
pub async fn create_vocabulary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<CreateVocabularyRequest>,
) -> Result<Json<ApiResponse<PodcastVocabulary>>> {
    auth.require_admin()?;
    req.validate()?;
    fetch_podcast(&state, &auth, id).await?;

    let sql = format!(
        r#"
        INSERT INTO podcast_vocabulary
            (podcast_id, word, translation, definition, example, timestamp_ms)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        VOCABULARY_COLUMNS
    );
    let vocabulary = sqlx::query_as::<_, PodcastVocabulary>(&sql)
        .bind(id)
        .bind(req.word.trim())
        .bind(&req.translation)
        .bind(&req.definition)
        .bind(&req.example)
        .bind(req.timestamp_ms)
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(vocabulary)))
}
