//! 响应 DTO 定义
//!
//! 所有 REST API 的响应体结构

use chrono::{DateTime, NaiveDate, Utc};
use learning::pagination::total_pages;
use learning::service::TodayProgress;
use learning::{Book, BookStats, Episode, Season, User, UserGuide, Video, VideoSubtitle};
use serde::Serialize;

/// 分页响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> PageResponse<T> {
    /// 创建分页响应，总页数向上取整
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            items,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 创建成功响应（无数据）
    pub fn success_empty() -> ApiResponse<()> {
        ApiResponse {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: None,
        }
    }

    /// 创建成功响应（自定义消息）
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 登录/注册响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: User,
}

/// Token 刷新响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    pub expires_at: i64,
}

/// 学习面板
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub due_cards: i64,
    pub total_cards: i64,
    pub books: Vec<Book>,
    pub today: TodayProgress,
    pub streak: u32,
}

/// 带统计的单词本
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub stats: BookStats,
}

/// 视频详情（剧集附带季列表）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    #[serde(flatten)]
    pub video: Video,
    pub seasons: Vec<Season>,
}

/// 季详情
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonDetail {
    #[serde(flatten)]
    pub season: Season,
    pub episodes: Vec<Episode>,
}

/// 字幕导入结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleImportResult {
    pub video_id: i64,
    pub episode_id: Option<i64>,
    pub language: String,
    pub cues: usize,
}

/// 当前播放位置的字幕
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleAtResponse {
    pub ms: i64,
    pub subtitle: Option<VideoSubtitle>,
}

/// 连续学习天数
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResponse {
    pub days: u32,
    pub today: NaiveDate,
}

/// VAPID 公钥
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VapidPublicKeyResponse {
    pub public_key: String,
}

/// 新手引导状态，尚未开始的页面返回默认值
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideResponse {
    pub page: String,
    pub completed: bool,
    pub step: i32,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GuideResponse {
    pub fn not_started(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            completed: false,
            step: 0,
            updated_at: None,
        }
    }
}

impl From<UserGuide> for GuideResponse {
    fn from(guide: UserGuide) -> Self {
        Self {
            page: guide.page,
            completed: guide.completed,
            step: guide.step,
            updated_at: Some(guide.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_response_total_pages_rounds_up() {
        let page = PageResponse::new(vec![1, 2, 3], 41, 1, 20);
        assert_eq!(page.total_pages, 3);

        let exact = PageResponse::new(Vec::<i32>::new(), 40, 2, 20);
        assert_eq!(exact.total_pages, 2);

        let empty = PageResponse::new(Vec::<i32>::new(), 0, 1, 20);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_api_response_serialization() {
        let json = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["code"], "SUCCESS");
        assert_eq!(json["data"], 42);

        let empty = serde_json::to_value(ApiResponse::<()>::success_empty()).unwrap();
        assert!(empty.get("data").is_none());
    }

    #[test]
    fn test_guide_not_started_defaults() {
        let guide = GuideResponse::not_started("dashboard");
        let json = serde_json::to_value(&guide).unwrap();
        assert_eq!(json["page"], "dashboard");
        assert_eq!(json["completed"], false);
        assert_eq!(json["step"], 0);
        assert!(json["updatedAt"].is_null());
    }
}
