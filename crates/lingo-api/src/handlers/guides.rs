//! 新手引导处理器

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use learning::UserGuide;
use validator::Validate;

use crate::auth::AuthUser;
use crate::dto::{ApiResponse, GuideResponse, UpdateGuideRequest};
use crate::error::{ApiError, Result};
use crate::state::AppState;

const GUIDE_COLUMNS: &str = "id, user_id, page, completed, step, created_at, updated_at";

const MAX_PAGE_LEN: usize = 50;

fn check_page(page: &str) -> Result<()> {
    if page.is_empty() || page.len() > MAX_PAGE_LEN {
        return Err(ApiError::Validation(format!(
            "页面标识长度必须在1-{}个字符之间",
            MAX_PAGE_LEN
        )));
    }
    Ok(())
}

/// 获取某页面的引导状态
///
/// GET /api/guides/{page}
pub async fn get_guide(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(page): Path<String>,
) -> Result<Json<ApiResponse<GuideResponse>>> {
    check_page(&page)?;

    let sql = format!(
        "SELECT {} FROM user_guides WHERE user_id = $1 AND page = $2",
        GUIDE_COLUMNS
    );
    let guide = sqlx::query_as::<_, UserGuide>(&sql)
        .bind(auth.id)
        .bind(&page)
        .fetch_optional(&state.pool)
        .await?;

    let response = match guide {
        Some(guide) => GuideResponse::from(guide),
        None => GuideResponse::not_started(page),
    };
    Ok(Json(ApiResponse::success(response)))
}

/// 更新某页面的引导状态，不存在时创建
///
/// PUT /api/guides/{page}
pub async fn update_guide(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(page): Path<String>,
    Json(req): Json<UpdateGuideRequest>,
) -> Result<Json<ApiResponse<GuideResponse>>> {
    check_page(&page)?;
    req.validate()?;

    let sql = format!(
        r#"
        INSERT INTO user_guides (user_id, page, completed, step)
        VALUES ($1, $2, COALESCE($3, FALSE), COALESCE($4, 0))
        ON CONFLICT (user_id, page) DO UPDATE SET
            completed = COALESCE($3, user_guides.completed),
            step = COALESCE($4, user_guides.step),
            updated_at = NOW()
        RETURNING {}
        "#,
        GUIDE_COLUMNS
    );
    let guide = sqlx::query_as::<_, UserGuide>(&sql)
        .bind(auth.id)
        .bind(&page)
        .bind(req.completed)
        .bind(req.step)
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(ApiResponse::success(GuideResponse::from(guide))))
}
