//! 视频内容 API 处理器
//!
//! 视频、季、集、字幕和词汇标注。写操作仅管理员可用，
//! 未发布的视频对普通用户不可见。

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use learning::subtitles::{self, Cue};
use learning::{Episode, Season, Video, VideoSubtitle, VideoVocabulary};
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{
    ApiResponse, CreateEpisodeRequest, CreateSeasonRequest, CreateVideoRequest,
    CreateVocabularyRequest, PageResponse, SeasonDetail, SubtitleAtQuery, SubtitleAtResponse,
    SubtitleImportResult, SubtitleQuery, UpdateVideoRequest, UploadSubtitlesRequest, VideoDetail,
    VideoFilter, VocabularyQuery,
};
use crate::error::{ApiError, Result};
use crate::state::AppState;

const VIDEO_COLUMNS: &str = "id, title, description, thumbnail_url, video_url, language, level, \
    category, duration_seconds, is_series, published, created_at, updated_at";

const SEASON_COLUMNS: &str = "id, video_id, number, title, created_at, updated_at";

const EPISODE_COLUMNS: &str =
    "e.id, e.season_id, e.number, e.title, e.video_url, e.duration_seconds, e.created_at, e.updated_at";

const SUBTITLE_COLUMNS: &str =
    "id, video_id, episode_id, language, seq, start_ms, end_ms, text, created_at, updated_at";

const VOCABULARY_COLUMNS: &str = "id, video_id, episode_id, word, translation, definition, \
    example, timestamp_ms, created_at, updated_at";

/// 查询视频，普通用户只能看到已发布的视频
pub(crate) async fn fetch_video(state: &AppState, auth: &AuthUser, id: i64) -> Result<Video> {
    let sql = format!(
        "SELECT {} FROM videos WHERE id = $1 AND ($2 OR published)",
        VIDEO_COLUMNS
    );
    sqlx::query_as::<_, Video>(&sql)
        .bind(id)
        .bind(auth.is_admin())
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::VideoNotFound(id))
}

async fn fetch_season(state: &AppState, auth: &AuthUser, id: i64) -> Result<Season> {
    sqlx::query_as::<_, Season>(
        r#"
        SELECT s.id, s.video_id, s.number, s.title, s.created_at, s.updated_at
        FROM seasons s
        JOIN videos v ON v.id = s.video_id
        WHERE s.id = $1 AND ($2 OR v.published)
        "#,
    )
    .bind(id)
    .bind(auth.is_admin())
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::SeasonNotFound(id))
}

/// 校验剧集属于指定视频
async fn ensure_episode_of_video(state: &AppState, video_id: i64, episode_id: i64) -> Result<()> {
    let exists: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM episodes e
            JOIN seasons s ON s.id = e.season_id
            WHERE e.id = $1 AND s.video_id = $2
        )
        "#,
    )
    .bind(episode_id)
    .bind(video_id)
    .fetch_one(&state.pool)
    .await?;

    if !exists.0 {
        return Err(ApiError::EpisodeNotFound(episode_id));
    }
    Ok(())
}

/// 分页获取视频列表
///
/// GET /api/videos?language=&level=&category=
pub async fn list_videos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(filter): Query<VideoFilter>,
) -> Result<Json<ApiResponse<PageResponse<Video>>>> {
    let pagination = filter.pagination();

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM videos
        WHERE ($1::text IS NULL OR language = $1)
          AND ($2::text IS NULL OR level = $2)
          AND ($3::text IS NULL OR category = $3)
          AND ($4 OR published)
        "#,
    )
    .bind(&filter.language)
    .bind(&filter.level)
    .bind(&filter.category)
    .bind(auth.is_admin())
    .fetch_one(&state.pool)
    .await?;

    let sql = format!(
        r#"
        SELECT {} FROM videos
        WHERE ($1::text IS NULL OR language = $1)
          AND ($2::text IS NULL OR level = $2)
          AND ($3::text IS NULL OR category = $3)
          AND ($4 OR published)
        ORDER BY created_at DESC, id DESC
        LIMIT $5 OFFSET $6
        "#,
        VIDEO_COLUMNS
    );
    let videos = sqlx::query_as::<_, Video>(&sql)
        .bind(&filter.language)
        .bind(&filter.level)
        .bind(&filter.category)
        .bind(auth.is_admin())
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        videos,
        total.0,
        pagination.page,
        pagination.limit,
    ))))
}

/// 创建视频
///
/// POST /api/videos
pub async fn create_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateVideoRequest>,
) -> Result<Json<ApiResponse<Video>>> {
    auth.require_admin()?;
    req.validate()?;

    let sql = format!(
        r#"
        INSERT INTO videos (title, description, thumbnail_url, video_url, language, level,
                            category, duration_seconds, is_series, published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {}
        "#,
        VIDEO_COLUMNS
    );
    let video = sqlx::query_as::<_, Video>(&sql)
        .bind(req.title.trim())
        .bind(&req.description)
        .bind(&req.thumbnail_url)
        .bind(&req.video_url)
        .bind(&req.language)
        .bind(&req.level)
        .bind(&req.category)
        .bind(req.duration_seconds)
        .bind(req.is_series.unwrap_or(false))
        .bind(req.published.unwrap_or(true))
        .fetch_one(&state.pool)
        .await?;

    info!(video_id = video.id, title = %video.title, "Video created");
    Ok(Json(ApiResponse::success(video)))
}

/// 获取视频详情，剧集附带季列表
///
/// GET /api/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<VideoDetail>>> {
    let video = fetch_video(&state, &auth, id).await?;

    let seasons = if video.is_series {
        let sql = format!(
            "SELECT {} FROM seasons WHERE video_id = $1 ORDER BY number ASC",
            SEASON_COLUMNS
        );
        sqlx::query_as::<_, Season>(&sql)
            .bind(id)
            .fetch_all(&state.pool)
            .await?
    } else {
        Vec::new()
    };

    Ok(Json(ApiResponse::success(VideoDetail { video, seasons })))
}

/// 更新视频
///
/// PATCH /api/videos/{id}
pub async fn update_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateVideoRequest>,
) -> Result<Json<ApiResponse<Video>>> {
    auth.require_admin()?;
    req.validate()?;

    let sql = format!(
        r#"
        UPDATE videos SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            thumbnail_url = COALESCE($4, thumbnail_url),
            video_url = COALESCE($5, video_url),
            language = COALESCE($6, language),
            level = COALESCE($7, level),
            category = COALESCE($8, category),
            duration_seconds = COALESCE($9, duration_seconds),
            is_series = COALESCE($10, is_series),
            published = COALESCE($11, published),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        VIDEO_COLUMNS
    );
    let video = sqlx::query_as::<_, Video>(&sql)
        .bind(id)
        .bind(req.title.as_deref().map(str::trim))
        .bind(&req.description)
        .bind(&req.thumbnail_url)
        .bind(&req.video_url)
        .bind(&req.language)
        .bind(&req.level)
        .bind(&req.category)
        .bind(req.duration_seconds)
        .bind(req.is_series)
        .bind(req.published)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::VideoNotFound(id))?;

    info!(video_id = id, "Video updated");
    Ok(Json(ApiResponse::success(video)))
}

/// 删除视频（季、集、字幕、词汇级联删除）
///
/// DELETE /api/videos/{id}
pub async fn delete_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    auth.require_admin()?;

    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::VideoNotFound(id));
    }

    info!(video_id = id, "Video deleted");
    Ok(Json(ApiResponse::<()>::success_empty()))
}

// ============================================
// 季与集
// ============================================

/// 获取视频的季列表
///
/// GET /api/videos/{id}/seasons
pub async fn list_seasons(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Season>>>> {
    fetch_video(&state, &auth, id).await?;

    let sql = format!(
        "SELECT {} FROM seasons WHERE video_id = $1 ORDER BY number ASC",
        SEASON_COLUMNS
    );
    let seasons = sqlx::query_as::<_, Season>(&sql)
        .bind(id)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(seasons)))
}

/// 创建季，同一视频的季编号唯一
///
/// POST /api/videos/{id}/seasons
pub async fn create_season(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<CreateSeasonRequest>,
) -> Result<Json<ApiResponse<Season>>> {
    auth.require_admin()?;
    req.validate()?;
    fetch_video(&state, &auth, id).await?;

    let sql = format!(
        "INSERT INTO seasons (video_id, number, title) VALUES ($1, $2, $3) RETURNING {}",
        SEASON_COLUMNS
    );
    let season = sqlx::query_as::<_, Season>(&sql)
        .bind(id)
        .bind(req.number)
        .bind(&req.title)
        .fetch_one(&state.pool)
        .await?;

    // 添加季后视频自动标记为剧集
    sqlx::query("UPDATE videos SET is_series = TRUE, updated_at = NOW() WHERE id = $1 AND NOT is_series")
        .bind(id)
        .execute(&state.pool)
        .await?;

    info!(video_id = id, season_id = season.id, number = season.number, "Season created");
    Ok(Json(ApiResponse::success(season)))
}

/// 获取季的剧集列表
///
/// GET /api/seasons/{id}/episodes
pub async fn list_episodes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<SeasonDetail>>> {
    let season = fetch_season(&state, &auth, id).await?;

    let sql = format!(
        "SELECT {} FROM episodes e WHERE e.season_id = $1 ORDER BY e.number ASC",
        EPISODE_COLUMNS
    );
    let episodes = sqlx::query_as::<_, Episode>(&sql)
        .bind(id)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(SeasonDetail { season, episodes })))
}

/// 创建剧集，同一季的集编号唯一
///
/// POST /api/seasons/{id}/episodes
pub async fn create_episode(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<CreateEpisodeRequest>,
) -> Result<Json<ApiResponse<Episode>>> {
    auth.require_admin()?;
    req.validate()?;
    fetch_season(&state, &auth, id).await?;

    let sql = format!(
        r#"
        INSERT INTO episodes AS e (season_id, number, title, video_url, duration_seconds)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        EPISODE_COLUMNS
    );
    let episode = sqlx::query_as::<_, Episode>(&sql)
        .bind(id)
        .bind(req.number)
        .bind(&req.title)
        .bind(&req.video_url)
        .bind(req.duration_seconds)
        .fetch_one(&state.pool)
        .await?;

    info!(season_id = id, episode_id = episode.id, "Episode created");
    Ok(Json(ApiResponse::success(episode)))
}

/// 获取剧集详情
///
/// GET /api/episodes/{id}
pub async fn get_episode(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Episode>>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM episodes e
        JOIN seasons s ON s.id = e.season_id
        JOIN videos v ON v.id = s.video_id
        WHERE e.id = $1 AND ($2 OR v.published)
        "#,
        EPISODE_COLUMNS
    );
    let episode = sqlx::query_as::<_, Episode>(&sql)
        .bind(id)
        .bind(auth.is_admin())
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::EpisodeNotFound(id))?;

    Ok(Json(ApiResponse::success(episode)))
}

// ============================================
// 字幕
// ============================================

async fn load_subtitles(
    state: &AppState,
    video_id: i64,
    episode_id: Option<i64>,
    language: Option<&str>,
) -> Result<Vec<VideoSubtitle>> {
    let sql = format!(
        r#"
        SELECT {} FROM video_subtitles
        WHERE video_id = $1
          AND episode_id IS NOT DISTINCT FROM $2
          AND ($3::text IS NULL OR language = $3)
        ORDER BY language ASC, seq ASC
        "#,
        SUBTITLE_COLUMNS
    );
    let rows = sqlx::query_as::<_, VideoSubtitle>(&sql)
        .bind(video_id)
        .bind(episode_id)
        .bind(language)
        .fetch_all(&state.pool)
        .await?;
    Ok(rows)
}

/// 获取字幕
///
/// GET /api/videos/{id}/subtitles?language=&episodeId=
pub async fn list_subtitles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Query(query): Query<SubtitleQuery>,
) -> Result<Json<ApiResponse<Vec<VideoSubtitle>>>> {
    fetch_video(&state, &auth, id).await?;
    let rows = load_subtitles(&state, id, query.episode_id, query.language.as_deref()).await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// 导入 SRT / WebVTT 字幕，替换同一视频（或剧集）同语言的已有字幕
///
/// POST /api/videos/{id}/subtitles
pub async fn upload_subtitles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UploadSubtitlesRequest>,
) -> Result<Json<ApiResponse<SubtitleImportResult>>> {
    auth.require_admin()?;
    req.validate()?;
    fetch_video(&state, &auth, id).await?;
    if let Some(episode_id) = req.episode_id {
        ensure_episode_of_video(&state, id, episode_id).await?;
    }

    let cues = subtitles::parse(req.format, &req.content)?;
    let count = cues.len();

    let mut seqs = Vec::with_capacity(count);
    let mut starts = Vec::with_capacity(count);
    let mut ends = Vec::with_capacity(count);
    let mut texts = Vec::with_capacity(count);
    for cue in cues {
        seqs.push(cue.seq);
        starts.push(cue.start_ms);
        ends.push(cue.end_ms);
        texts.push(cue.text);
    }

    let mut tx = state.pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM video_subtitles
        WHERE video_id = $1 AND episode_id IS NOT DISTINCT FROM $2 AND language = $3
        "#,
    )
    .bind(id)
    .bind(req.episode_id)
    .bind(&req.language)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO video_subtitles (video_id, episode_id, language, seq, start_ms, end_ms, text)
        SELECT $1, $2, $3, t.seq, t.start_ms, t.end_ms, t.text
        FROM UNNEST($4::int[], $5::bigint[], $6::bigint[], $7::text[])
            AS t(seq, start_ms, end_ms, text)
        "#,
    )
    .bind(id)
    .bind(req.episode_id)
    .bind(&req.language)
    .bind(seqs)
    .bind(starts)
    .bind(ends)
    .bind(texts)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        video_id = id,
        episode_id = ?req.episode_id,
        language = %req.language,
        cues = count,
        "Subtitles imported"
    );

    Ok(Json(ApiResponse::success(SubtitleImportResult {
        video_id: id,
        episode_id: req.episode_id,
        language: req.language,
        cues: count,
    })))
}

/// 获取播放位置所在的字幕，语言缺省为视频语言
///
/// GET /api/videos/{id}/subtitles/at?ms=
pub async fn subtitle_at(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Query(query): Query<SubtitleAtQuery>,
) -> Result<Json<ApiResponse<SubtitleAtResponse>>> {
    if query.ms < 0 {
        return Err(ApiError::Validation("播放位置不能为负数".to_string()));
    }
    let video = fetch_video(&state, &auth, id).await?;
    let language = query.language.unwrap_or(video.language);

    let rows = load_subtitles(&state, id, query.episode_id, Some(&language)).await?;
    let cues: Vec<Cue> = rows
        .iter()
        .map(|row| Cue {
            seq: row.seq,
            start_ms: row.start_ms,
            end_ms: row.end_ms,
            text: row.text.clone(),
        })
        .collect();
    let seq = subtitles::cue_at(&cues, query.ms).map(|cue| cue.seq);
    let subtitle = seq.and_then(|seq| rows.into_iter().find(|row| row.seq == seq));

    Ok(Json(ApiResponse::success(SubtitleAtResponse {
        ms: query.ms,
        subtitle,
    })))
}

// ============================================
// 词汇
// ============================================

/// 获取视频词汇，指定 episodeId 时只返回该集的词汇
///
/// GET /api/videos/{id}/vocabulary
pub async fn list_vocabulary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Query(query): Query<VocabularyQuery>,
) -> Result<Json<ApiResponse<Vec<VideoVocabulary>>>> {
    fetch_video(&state, &auth, id).await?;

    let sql = format!(
        r#"
        SELECT {} FROM video_vocabulary
        WHERE video_id = $1 AND ($2::bigint IS NULL OR episode_id = $2)
        ORDER BY timestamp_ms ASC NULLS LAST, id ASC
        "#,
        VOCABULARY_COLUMNS
    );
    let rows = sqlx::query_as::<_, VideoVocabulary>(&sql)
        .bind(id)
        .bind(query.episode_id)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(rows)))
}

/// 添加视频词汇
///
/// POST /api/videos/{id}/vocabulary
pub async fn create_vocabulary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<CreateVocabularyRequest>,
) -> Result<Json<ApiResponse<VideoVocabulary>>> {
    auth.require_admin()?;
    req.validate()?;
    fetch_video(&state, &auth, id).await?;
    if let Some(episode_id) = req.episode_id {
        ensure_episode_of_video(&state, id, episode_id).await?;
    }

    let sql = format!(
        r#"
        INSERT INTO video_vocabulary
            (video_id, episode_id, word, translation, definition, example, timestamp_ms)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        VOCABULARY_COLUMNS
    );
    let vocabulary = sqlx::query_as::<_, VideoVocabulary>(&sql)
        .bind(id)
        .bind(req.episode_id)
        .bind(req.word.trim())
        .bind(&req.translation)
        .bind(&req.definition)
        .bind(&req.example)
        .bind(req.timestamp_ms)
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(vocabulary)))
}
