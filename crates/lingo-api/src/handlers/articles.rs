//! 文章 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use learning::{Article, ArticleVocabulary};
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{
    ApiResponse, ContentFilter, CreateArticleRequest, CreateVocabularyRequest, PageResponse,
    UpdateArticleRequest,
};
use crate::error::{ApiError, Result};
use crate::state::AppState;

const ARTICLE_COLUMNS: &str = "id, title, summary, body, cover_url, language, level, author, \
    published, created_at, updated_at";

const VOCABULARY_COLUMNS: &str =
    "id, article_id, word, translation, definition, example, created_at, updated_at";

async fn fetch_article(state: &AppState, auth: &AuthUser, id: i64) -> Result<Article> {
    let sql = format!(
        "SELECT {} FROM articles WHERE id = $1 AND ($2 OR published)",
        ARTICLE_COLUMNS
    );
    sqlx::query_as::<_, Article>(&sql)
        .bind(id)
        .bind(auth.is_admin())
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::ArticleNotFound(id))
}

/// 分页获取文章列表
///
/// GET /api/articles?language=&level=
pub async fn list_articles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(filter): Query<ContentFilter>,
) -> Result<Json<ApiResponse<PageResponse<Article>>>> {
    let pagination = filter.pagination();

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM articles
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
        SELECT {} FROM articles
        WHERE ($1::text IS NULL OR language = $1)
          AND ($2::text IS NULL OR level = $2)
          AND ($3 OR published)
        ORDER BY created_at DESC, id DESC
        LIMIT $4 OFFSET $5
        "#,
        ARTICLE_COLUMNS
    );
    let articles = sqlx::query_as::<_, Article>(&sql)
        .bind(&filter.language)
        .bind(&filter.level)
        .bind(auth.is_admin())
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        articles,
        total.0,
        pagination.page,
        pagination.limit,
    ))))
}

/// 创建文章
///
/// POST /api/articles
pub async fn create_article(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateArticleRequest>,
) -> Result<Json<ApiResponse<Article>>> {
    auth.require_admin()?;
    req.validate()?;

    let sql = format!(
        r#"
        INSERT INTO articles (title, summary, body, cover_url, language, level, author, published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        ARTICLE_COLUMNS
    );
    let article = sqlx::query_as::<_, Article>(&sql)
        .bind(req.title.trim())
        .bind(&req.summary)
        .bind(&req.body)
        .bind(&req.cover_url)
        .bind(&req.language)
        .bind(&req.level)
        .bind(&req.author)
        .bind(req.published.unwrap_or(true))
        .fetch_one(&state.pool)
        .await?;

    info!(article_id = article.id, title = %article.title, "Article created");
    Ok(Json(ApiResponse::success(article)))
}

/// 获取文章详情
///
/// GET /api/articles/{id}
pub async fn get_article(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Article>>> {
    let article = fetch_article(&state, &auth, id).await?;
    Ok(Json(ApiResponse::success(article)))
}

/// 更新文章
///
/// PATCH /api/articles/{id}
pub async fn update_article(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateArticleRequest>,
) -> Result<Json<ApiResponse<Article>>> {
    auth.require_admin()?;
    req.validate()?;

    let sql = format!(
        r#"
        UPDATE articles SET
            title = COALESCE($2, title),
            summary = COALESCE($3, summary),
            body = COALESCE($4, body),
            cover_url = COALESCE($5, cover_url),
            language = COALESCE($6, language),
            level = COALESCE($7, level),
            author = COALESCE($8, author),
            published = COALESCE($9, published),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        ARTICLE_COLUMNS
    );
    let article = sqlx::query_as::<_, Article>(&sql)
        .bind(id)
        .bind(req.title.as_deref().map(str::trim))
        .bind(&req.summary)
        .bind(&req.body)
        .bind(&req.cover_url)
        .bind(&req.language)
        .bind(&req.level)
        .bind(&req.author)
        .bind(req.published)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::ArticleNotFound(id))?;

    info!(article_id = id, "Article updated");
    Ok(Json(ApiResponse::success(article)))
}

/// 删除文章
///
/// DELETE /api/articles/{id}
pub async fn delete_article(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    auth.require_admin()?;

    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::ArticleNotFound(id));
    }

    info!(article_id = id, "Article deleted");
    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 获取文章词汇
///
/// GET /api/articles/{id}/vocabulary
pub async fn list_vocabulary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ArticleVocabulary>>>> {
    fetch_article(&state, &auth, id).await?;

    let sql = format!(
        "SELECT {} FROM article_vocabulary WHERE article_id = $1 ORDER BY id ASC",
        VOCABULARY_COLUMNS
    );
    let rows = sqlx::query_as::<_, ArticleVocabulary>(&sql)
        .bind(id)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(rows)))
}

/// 添加文章词汇，timestampMs 与 episodeId 对文章无意义，忽略
///
/// POST /api/articles/{id}/vocabulary
pub async fn create_vocabulary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<CreateVocabularyRequest>,
) -> Result<Json<ApiResponse<ArticleVocabulary>>> {
    auth.require_admin()?;
    req.validate()?;
    fetch_article(&state, &auth, id).await?;

    let sql = format!(
        r#"
        INSERT INTO article_vocabulary (article_id, word, translation, definition, example)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        VOCABULARY_COLUMNS
    );
    let vocabulary = sqlx::query_as::<_, ArticleVocabulary>(&sql)
        .bind(id)
        .bind(req.word.trim())
        .bind(&req.translation)
        .bind(&req.definition)
        .bind(&req.example)
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(vocabulary)))
}
