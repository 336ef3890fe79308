//! 学习服务枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 用户角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    /// 管理员 - 可维护视频、播客、文章等内容
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// 学习内容类型
///
/// 笔记、划线、活动记录通过 (content_type, content_id) 关联到具体内容
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Episode,
    Podcast,
    Article,
}

impl ContentType {
    /// 该内容对应的每日活动项
    pub fn activity_type(&self) -> ActivityType {
        match self {
            Self::Video | Self::Episode => ActivityType::Video,
            Self::Podcast => ActivityType::Podcast,
            Self::Article => ActivityType::Article,
        }
    }
}

/// 每日活动类型
///
/// 每天四项活动，每完成一项进度增加 25%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ActivityType {
    Video,
    Podcast,
    Article,
    Review,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [Self::Video, Self::Podcast, Self::Article, Self::Review];
}

/// 通知发送状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum NotificationStatus {
    /// 已写入记录，推送尚在发送中
    Pending,
    Sent,
    Failed,
}

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum NotificationKind {
    /// 待复习卡片提醒
    ReviewReminder,
    /// 每日目标未完成提醒
    DailyGoal,
    /// 连续学习天数
    Streak,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReviewReminder => "review_reminder",
            Self::DailyGoal => "daily_goal",
            Self::Streak => "streak",
        }
    }
}

/// 可生成单词卡的词汇来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyKind {
    Video,
    Podcast,
    Article,
}

impl VocabularyKind {
    /// 对应的词汇表名
    pub fn table(&self) -> &'static str {
        match self {
            Self::Video => "video_vocabulary",
            Self::Podcast => "podcast_vocabulary",
            Self::Article => "article_vocabulary",
        }
    }

    /// 词汇所属内容的表名及外键列
    pub fn parent(&self) -> (&'static str, &'static str) {
        match self {
            Self::Video => ("videos", "video_id"),
            Self::Podcast => ("podcasts", "podcast_id"),
            Self::Article => ("articles", "article_id"),
        }
    }
}

impl FromStr for VocabularyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Self::Video),
            "podcast" => Ok(Self::Podcast),
            "article" => Ok(Self::Article),
            other => Err(format!("unknown vocabulary kind: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_serde() {
        let json = serde_json::to_string(&ContentType::Episode).unwrap();
        assert_eq!(json, "\"episode\"");
        let parsed: ContentType = serde_json::from_str("\"podcast\"").unwrap();
        assert_eq!(parsed, ContentType::Podcast);
    }

    #[test]
    fn test_episode_counts_as_video_activity() {
        assert_eq!(ContentType::Episode.activity_type(), ActivityType::Video);
        assert_eq!(ContentType::Article.activity_type(), ActivityType::Article);
    }

    #[test]
    fn test_role_round_trip_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("root".parse::<UserRole>().is_err());
        assert_eq!(UserRole::default().to_string(), "user");
    }

    #[test]
    fn test_notification_kind_snake_case() {
        let json = serde_json::to_string(&NotificationKind::ReviewReminder).unwrap();
        assert_eq!(json, "\"review_reminder\"");
        assert_eq!(NotificationKind::DailyGoal.as_str(), "daily_goal");
    }

    #[test]
    fn test_vocabulary_kind_table() {
        assert_eq!(
            "podcast".parse::<VocabularyKind>().unwrap().table(),
            "podcast_vocabulary"
        );
        assert!("episode".parse::<VocabularyKind>().is_err());
    }
}
