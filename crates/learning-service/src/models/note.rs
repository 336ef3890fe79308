//! 笔记与划线实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::ContentType;

/// 学习笔记
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub content_type: ContentType,
    pub content_id: i64,
    #[sqlx(default)]
    pub title: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 文本划线
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: i64,
    pub user_id: i64,
    pub content_type: ContentType,
    pub content_id: i64,
    /// 关联的笔记（可选）
    #[sqlx(default)]
    pub note_id: Option<i64>,
    pub text: String,
    #[sqlx(default)]
    pub color: Option<String>,
    pub start_offset: i32,
    pub end_offset: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
