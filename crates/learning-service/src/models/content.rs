//! 学习内容实体定义
//!
//! 视频（含剧集结构 Video -> Season -> Episode）、播客、文章及其字幕和词汇标注

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 视频
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i64,
    pub title: String,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub thumbnail_url: Option<String>,
    #[sqlx(default)]
    pub video_url: Option<String>,
    pub language: String,
    #[sqlx(default)]
    pub level: Option<String>,
    #[sqlx(default)]
    pub category: Option<String>,
    #[sqlx(default)]
    pub duration_seconds: Option<i32>,
    /// 是否为剧集（包含季和集）
    pub is_series: bool,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 季
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: i64,
    pub video_id: i64,
    pub number: i32,
    #[sqlx(default)]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 集
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: i64,
    pub season_id: i64,
    pub number: i32,
    #[sqlx(default)]
    pub title: Option<String>,
    #[sqlx(default)]
    pub video_url: Option<String>,
    #[sqlx(default)]
    pub duration_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 视频字幕条目
///
/// `episode_id` 为空时属于视频本身
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VideoSubtitle {
    pub id: i64,
    pub video_id: i64,
    #[sqlx(default)]
    pub episode_id: Option<i64>,
    pub language: String,
    pub seq: i32,
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 视频词汇标注
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VideoVocabulary {
    pub id: i64,
    pub video_id: i64,
    #[sqlx(default)]
    pub episode_id: Option<i64>,
    pub word: String,
    #[sqlx(default)]
    pub translation: Option<String>,
    #[sqlx(default)]
    pub definition: Option<String>,
    #[sqlx(default)]
    pub example: Option<String>,
    /// 单词出现的时间点（毫秒）
    #[sqlx(default)]
    pub timestamp_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 播客
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Podcast {
    pub id: i64,
    pub title: String,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub audio_url: Option<String>,
    #[sqlx(default)]
    pub cover_url: Option<String>,
    pub language: String,
    #[sqlx(default)]
    pub level: Option<String>,
    #[sqlx(default)]
    pub duration_seconds: Option<i32>,
    #[sqlx(default)]
    pub transcript: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 播客词汇标注
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PodcastVocabulary {
    pub id: i64,
    pub podcast_id: i64,
    pub word: String,
    #[sqlx(default)]
    pub translation: Option<String>,
    #[sqlx(default)]
    pub definition: Option<String>,
    #[sqlx(default)]
    pub example: Option<String>,
    #[sqlx(default)]
    pub timestamp_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 文章
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    #[sqlx(default)]
    pub summary: Option<String>,
    pub body: String,
    #[sqlx(default)]
    pub cover_url: Option<String>,
    pub language: String,
    #[sqlx(default)]
    pub level: Option<String>,
    #[sqlx(default)]
    pub author: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 文章词汇标注
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArticleVocabulary {
    pub id: i64,
    pub article_id: i64,
    pub word: String,
    #[sqlx(default)]
    pub translation: Option<String>,
    #[sqlx(default)]
    pub definition: Option<String>,
    #[sqlx(default)]
    pub example: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 词汇条目的公共部分，用于从任意来源生成单词卡
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct VocabularyEntry {
    pub word: String,
    #[sqlx(default)]
    pub translation: Option<String>,
    #[sqlx(default)]
    pub definition: Option<String>,
    #[sqlx(default)]
    pub example: Option<String>,
}

impl VocabularyEntry {
    /// 卡片背面：优先使用翻译，其次释义，两者都有时合并
    pub fn card_back(&self) -> String {
        match (&self.translation, &self.definition) {
            (Some(t), Some(d)) if !t.is_empty() && !d.is_empty() => format!("{}\n{}", t, d),
            (Some(t), _) if !t.is_empty() => t.clone(),
            (_, Some(d)) if !d.is_empty() => d.clone(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(translation: Option<&str>, definition: Option<&str>) -> VocabularyEntry {
        VocabularyEntry {
            word: "serendipity".to_string(),
            translation: translation.map(String::from),
            definition: definition.map(String::from),
            example: None,
        }
    }

    #[test]
    fn test_card_back_prefers_translation() {
        assert_eq!(entry(Some("机缘巧合"), None).card_back(), "机缘巧合");
        assert_eq!(
            entry(None, Some("a happy accident")).card_back(),
            "a happy accident"
        );
        assert_eq!(
            entry(Some("机缘巧合"), Some("a happy accident")).card_back(),
            "机缘巧合\na happy accident"
        );
        assert_eq!(entry(Some(""), None).card_back(), "");
    }
}
