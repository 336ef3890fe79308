//! 学习进度实体定义

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ActivityType, ContentType};

/// 每日学习汇总
///
/// (user_id, activity_date) 唯一
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub id: i64,
    pub user_id: i64,
    pub activity_date: NaiveDate,
    pub watched_video: bool,
    pub listened_podcast: bool,
    pub read_article: bool,
    pub reviewed_cards: bool,
    /// 完成百分比：0 / 25 / 50 / 75 / 100
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 单次学习行为记录
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTracking {
    pub id: i64,
    pub user_id: i64,
    pub activity_type: ActivityType,
    #[sqlx(default)]
    pub content_type: Option<ContentType>,
    #[sqlx(default)]
    pub content_id: Option<i64>,
    pub duration_seconds: i32,
    pub tracked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新的学习行为
#[derive(Debug, Clone)]
pub struct NewActivityTracking {
    pub user_id: i64,
    pub activity_type: ActivityType,
    pub content_type: Option<ContentType>,
    pub content_id: Option<i64>,
    pub duration_seconds: i32,
    pub tracked_at: DateTime<Utc>,
}

/// 某用户某天出现过的活动类型，用于汇总任务
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TrackedActivity {
    pub user_id: i64,
    pub activity_type: ActivityType,
}

/// 新手引导状态
///
/// (user_id, page) 唯一
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserGuide {
    pub id: i64,
    pub user_id: i64,
    pub page: String,
    pub completed: bool,
    pub step: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
