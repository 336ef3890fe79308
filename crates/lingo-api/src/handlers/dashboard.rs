//! 学习面板处理器

use axum::{Extension, Json, extract::State};
use chrono::Utc;
use learning::repository::CardRepositoryTrait;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, DashboardResponse};
use crate::error::Result;
use crate::state::AppState;

/// 学习面板：待复习数、卡片总数、单词本、今日进度和连续天数
///
/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<DashboardResponse>>> {
    let now = Utc::now();
    let (due_cards, total_cards, books, today, streak) = futures::try_join!(
        state.card_repo.count_due(auth.id, now),
        state.card_repo.count_cards(auth.id),
        state.card_repo.list_books(auth.id),
        state.activity_service.today_progress(auth.id),
        state.activity_service.streak(auth.id),
    )?;

    Ok(Json(ApiResponse::success(DashboardResponse {
        due_cards,
        total_cards,
        books,
        today,
        streak,
    })))
}
