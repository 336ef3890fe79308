//! 单词本管理 API 处理器
//!
//! 单词本只对所有者可见，其他用户的 ID 一律返回 404

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use learning::repository::CardRepositoryTrait;
use learning::service::CreateCardInput;
use learning::{Book, Card};
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{
    ApiResponse, BookDetail, CreateBookRequest, CreateCardRequest, PageResponse,
    PaginationParams, UpdateBookRequest,
};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 获取单词本列表
///
/// GET /api/books
pub async fn list_books(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Book>>>> {
    let books = state.card_repo.list_books(auth.id).await?;
    Ok(Json(ApiResponse::success(books)))
}

/// 创建单词本
///
/// POST /api/books
pub async fn create_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateBookRequest>,
) -> Result<Json<ApiResponse<Book>>> {
    req.validate()?;

    let book = state
        .card_repo
        .create_book(auth.id, req.title.trim(), req.description, req.color)
        .await?;

    info!(user_id = auth.id, book_id = book.id, "Book created");
    Ok(Json(ApiResponse::success(book)))
}

/// 获取单词本详情（含统计）
///
/// GET /api/books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BookDetail>>> {
    let book = state
        .card_repo
        .get_book(auth.id, id)
        .await?
        .ok_or(ApiError::BookNotFound(id))?;
    let stats = state.review_service.book_stats(auth.id, id).await?;

    Ok(Json(ApiResponse::success(BookDetail { book, stats })))
}

/// 更新单词本
///
/// PATCH /api/books/{id}
pub async fn update_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Json<ApiResponse<Book>>> {
    req.validate()?;

    let book = state
        .card_repo
        .update_book(
            auth.id,
            id,
            req.title.map(|t| t.trim().to_string()),
            req.description,
            req.color,
        )
        .await?
        .ok_or(ApiError::BookNotFound(id))?;

    info!(user_id = auth.id, book_id = id, "Book updated");
    Ok(Json(ApiResponse::success(book)))
}

/// 删除单词本（卡片随之删除）
///
/// DELETE /api/books/{id}
pub async fn delete_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.card_repo.delete_book(auth.id, id).await? {
        return Err(ApiError::BookNotFound(id));
    }

    info!(user_id = auth.id, book_id = id, "Book deleted");
    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 分页获取单词本中的卡片
///
/// GET /api/books/{id}/cards
pub async fn list_book_cards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Card>>>> {
    state
        .card_repo
        .get_book(auth.id, id)
        .await?
        .ok_or(ApiError::BookNotFound(id))?;

    let pagination = params.pagination();
    let (cards, total) = state.card_repo.list_cards(auth.id, id, pagination).await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        cards,
        total,
        pagination.page,
        pagination.limit,
    ))))
}

/// 在单词本中创建卡片
///
/// POST /api/books/{id}/cards
pub async fn create_book_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<CreateCardRequest>,
) -> Result<Json<ApiResponse<Card>>> {
    req.validate()?;

    let card = state
        .review_service
        .create_card(
            auth.id,
            CreateCardInput {
                book_id: id,
                front: req.front,
                back: req.back,
                example: req.example,
                box_number: req.box_number,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(card)))
}
