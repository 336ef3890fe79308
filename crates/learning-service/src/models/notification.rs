//! 推送订阅与通知记录实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{NotificationKind, NotificationStatus};

/// 浏览器推送订阅
///
/// endpoint 全局唯一，同一浏览器重复订阅会覆盖归属用户
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub id: i64,
    pub user_id: i64,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    #[sqlx(default)]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新的推送订阅
#[derive(Debug, Clone)]
pub struct NewPushSubscription {
    pub user_id: i64,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub user_agent: Option<String>,
}

/// 通知记录
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLog {
    pub id: i64,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub status: NotificationStatus,
    #[sqlx(default)]
    pub error: Option<String>,
    #[sqlx(default)]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新的通知记录
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotificationLog {
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub status: NotificationStatus,
    pub error: Option<String>,
}

/// 复习提醒候选用户：开启提醒且有待复习卡片
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ReminderCandidate {
    pub user_id: i64,
    pub name: String,
    pub due_count: i64,
}
