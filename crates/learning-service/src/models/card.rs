//! 单词本与卡片实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单词本（卡片集合）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 单词卡
///
/// `box_number` 为 Leitner 盒子编号，`next_review_at` 为下次复习时间
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub front: String,
    pub back: String,
    #[sqlx(default)]
    pub example: Option<String>,
    pub box_number: i32,
    pub next_review_at: DateTime<Utc>,
    #[sqlx(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub review_count: i32,
    pub correct_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}

/// 新建卡片
#[derive(Debug, Clone)]
pub struct NewCard {
    pub user_id: i64,
    pub book_id: i64,
    pub front: String,
    pub back: String,
    pub example: Option<String>,
    pub box_number: i32,
    pub next_review_at: DateTime<Utc>,
}

/// 卡片内容更新，None 表示不修改
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub front: Option<String>,
    pub back: Option<String>,
    pub example: Option<String>,
}

/// 单词本统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
    pub total: i64,
    pub due: i64,
    /// 已达到最高盒子的卡片数
    pub mastered: i64,
}
