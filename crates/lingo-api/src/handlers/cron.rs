//! 定时任务触发端点
//!
//! 供外部调度器（如平台 cron）调用，鉴权由 cron_auth 中间件完成

use axum::{
    Json,
    extract::{Query, State},
};
use learning::service::AggregateReport;
use notification_worker::JobReport;
use tracing::info;

use crate::dto::{ApiResponse, DailyActivityCronQuery};
use crate::error::Result;
use crate::state::AppState;

/// 发送复习提醒
///
/// POST /api/cron/review-reminders
pub async fn review_reminders(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<JobReport>>> {
    let report = state.review_reminder_job.run().await?;
    info!(
        notified = report.notified,
        failed = report.failed,
        "Review reminders triggered via cron endpoint"
    );
    Ok(Json(ApiResponse::success(report)))
}

/// 汇总每日学习进度，缺省为昨天
///
/// POST /api/cron/daily-activity?date=
pub async fn daily_activity(
    State(state): State<AppState>,
    Query(query): Query<DailyActivityCronQuery>,
) -> Result<Json<ApiResponse<AggregateReport>>> {
    let report = state.daily_activity_job.run(query.date).await?;
    Ok(Json(ApiResponse::success(report)))
}
