//! 请求 DTO 定义
//!
//! 所有 REST API 的请求参数和请求体结构

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::NaiveDate;
use learning::pagination::Pagination;
use learning::subtitles::SubtitleFormat;
use learning::{ActivityType, ContentType};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;

/// 注册请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "密码长度必须在8-128个字符之间"))]
    pub password: String,
    #[validate(length(min = 1, max = 50, message = "昵称长度必须在1-50个字符之间"))]
    pub name: String,
    pub native_language: Option<String>,
    pub target_language: Option<String>,
    pub level: Option<String>,
}

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "密码长度必须在1-128个字符之间"))]
    pub password: String,
}

/// 更新个人资料请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "昵称长度必须在1-50个字符之间"))]
    pub name: Option<String>,
    pub native_language: Option<String>,
    pub target_language: Option<String>,
    pub level: Option<String>,
    pub reminder_enabled: Option<bool>,
}

/// 分页查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

// ============================================
// 单词本与卡片
// ============================================

/// 创建单词本请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 100, message = "单词本名称长度必须在1-100个字符之间"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 20, message = "颜色值过长"))]
    pub color: Option<String>,
}

/// 更新单词本请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 100, message = "单词本名称长度必须在1-100个字符之间"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 20, message = "颜色值过长"))]
    pub color: Option<String>,
}

/// 创建卡片请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    #[validate(length(min = 1, max = 500, message = "卡片正面长度必须在1-500个字符之间"))]
    pub front: String,
    #[validate(length(max = 2000, message = "卡片背面不能超过2000个字符"))]
    pub back: String,
    pub example: Option<String>,
    /// 初始盒子编号，缺省为 0
    #[validate(range(min = 0, max = 6, message = "盒子编号必须在0-6之间"))]
    pub box_number: Option<i32>,
}

/// 更新卡片请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    #[validate(length(min = 1, max = 500, message = "卡片正面长度必须在1-500个字符之间"))]
    pub front: Option<String>,
    #[validate(length(max = 2000, message = "卡片背面不能超过2000个字符"))]
    pub back: Option<String>,
    pub example: Option<String>,
}

/// 复习结果
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCardRequest {
    pub remembered: bool,
}

/// 待复习卡片查询
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCardsQuery {
    pub limit: Option<i64>,
}

// ============================================
// 视频
// ============================================

/// 视频列表过滤
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub language: Option<String>,
    pub level: Option<String>,
    pub category: Option<String>,
}

impl VideoFilter {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

/// 创建视频请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, max = 200, message = "标题长度必须在1-200个字符之间"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(url(message = "缩略图地址必须是有效的URL"))]
    pub thumbnail_url: Option<String>,
    #[validate(url(message = "视频地址必须是有效的URL"))]
    pub video_url: Option<String>,
    #[validate(length(min = 2, max = 10, message = "语言代码长度必须在2-10个字符之间"))]
    pub language: String,
    pub level: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0, message = "时长不能为负数"))]
    pub duration_seconds: Option<i32>,
    pub is_series: Option<bool>,
    pub published: Option<bool>,
}

/// 更新视频请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 200, message = "标题长度必须在1-200个字符之间"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(url(message = "缩略图地址必须是有效的URL"))]
    pub thumbnail_url: Option<String>,
    #[validate(url(message = "视频地址必须是有效的URL"))]
    pub video_url: Option<String>,
    #[validate(length(min = 2, max = 10, message = "语言代码长度必须在2-10个字符之间"))]
    pub language: Option<String>,
    pub level: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0, message = "时长不能为负数"))]
    pub duration_seconds: Option<i32>,
    pub is_series: Option<bool>,
    pub published: Option<bool>,
}

/// 创建季请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSeasonRequest {
    #[validate(range(min = 1, message = "季编号从1开始"))]
    pub number: i32,
    pub title: Option<String>,
}

/// 创建剧集请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEpisodeRequest {
    #[validate(range(min = 1, message = "集编号从1开始"))]
    pub number: i32,
    pub title: Option<String>,
    #[validate(url(message = "视频地址必须是有效的URL"))]
    pub video_url: Option<String>,
    #[validate(range(min = 0, message = "时长不能为负数"))]
    pub duration_seconds: Option<i32>,
}

/// 字幕导入请求，已有的同语言字幕会被替换
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadSubtitlesRequest {
    pub format: SubtitleFormat,
    #[validate(length(min = 1, message = "字幕内容不能为空"))]
    pub content: String,
    #[validate(length(min = 2, max = 10, message = "语言代码长度必须在2-10个字符之间"))]
    pub language: String,
    pub episode_id: Option<i64>,
}

/// 字幕查询
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleQuery {
    pub language: Option<String>,
    pub episode_id: Option<i64>,
}

/// 按播放位置查询字幕
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleAtQuery {
    pub ms: i64,
    pub language: Option<String>,
    pub episode_id: Option<i64>,
}

/// 词汇查询
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyQuery {
    pub episode_id: Option<i64>,
}

/// 添加词汇请求（视频、播客、文章共用）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVocabularyRequest {
    #[validate(length(min = 1, max = 200, message = "单词长度必须在1-200个字符之间"))]
    pub word: String,
    pub translation: Option<String>,
    pub definition: Option<String>,
    pub example: Option<String>,
    /// 出现位置（毫秒），文章忽略
    #[validate(range(min = 0, message = "时间点不能为负数"))]
    pub timestamp_ms: Option<i64>,
    /// 所属剧集，仅视频使用
    pub episode_id: Option<i64>,
}

// ============================================
// 播客与文章
// ============================================

/// 内容列表过滤（播客、文章）
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub language: Option<String>,
    pub level: Option<String>,
}

impl ContentFilter {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

/// 创建播客请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePodcastRequest {
    #[validate(length(min = 1, max = 200, message = "标题长度必须在1-200个字符之间"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(url(message = "音频地址必须是有效的URL"))]
    pub audio_url: Option<String>,
    #[validate(url(message = "封面地址必须是有效的URL"))]
    pub cover_url: Option<String>,
    #[validate(length(min = 2, max = 10, message = "语言代码长度必须在2-10个字符之间"))]
    pub language: String,
    pub level: Option<String>,
    #[validate(range(min = 0, message = "时长不能为负数"))]
    pub duration_seconds: Option<i32>,
    pub transcript: Option<String>,
    pub published: Option<bool>,
}

/// 更新播客请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePodcastRequest {
    #[validate(length(min = 1, max = 200, message = "标题长度必须在1-200个字符之间"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(url(message = "音频地址必须是有效的URL"))]
    pub audio_url: Option<String>,
    #[validate(url(message = "封面地址必须是有效的URL"))]
    pub cover_url: Option<String>,
    #[validate(length(min = 2, max = 10, message = "语言代码长度必须在2-10个字符之间"))]
    pub language: Option<String>,
    pub level: Option<String>,
    #[validate(range(min = 0, message = "时长不能为负数"))]
    pub duration_seconds: Option<i32>,
    pub transcript: Option<String>,
    pub published: Option<bool>,
}

/// 创建文章请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 200, message = "标题长度必须在1-200个字符之间"))]
    pub title: String,
    pub summary: Option<String>,
    #[validate(length(min = 1, message = "正文不能为空"))]
    pub body: String,
    #[validate(url(message = "封面地址必须是有效的URL"))]
    pub cover_url: Option<String>,
    #[validate(length(min = 2, max = 10, message = "语言代码长度必须在2-10个字符之间"))]
    pub language: String,
    pub level: Option<String>,
    pub author: Option<String>,
    pub published: Option<bool>,
}

/// 更新文章请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[validate(length(min = 1, max = 200, message = "标题长度必须在1-200个字符之间"))]
    pub title: Option<String>,
    pub summary: Option<String>,
    #[validate(length(min = 1, message = "正文不能为空"))]
    pub body: Option<String>,
    #[validate(url(message = "封面地址必须是有效的URL"))]
    pub cover_url: Option<String>,
    #[validate(length(min = 2, max = 10, message = "语言代码长度必须在2-10个字符之间"))]
    pub language: Option<String>,
    pub level: Option<String>,
    pub author: Option<String>,
    pub published: Option<bool>,
}

/// 词汇生成卡片请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyToCardRequest {
    pub book_id: i64,
}

// ============================================
// 笔记与划线
// ============================================

/// 笔记/划线过滤
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub content_type: Option<ContentType>,
    pub content_id: Option<i64>,
}

impl NoteFilter {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

/// 创建笔记请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub content_type: ContentType,
    pub content_id: i64,
    #[validate(length(max = 200, message = "标题不能超过200个字符"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10000, message = "笔记内容长度必须在1-10000个字符之间"))]
    pub body: String,
}

/// 更新笔记请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    #[validate(length(max = 200, message = "标题不能超过200个字符"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10000, message = "笔记内容长度必须在1-10000个字符之间"))]
    pub body: Option<String>,
}

/// 创建划线请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHighlightRequest {
    pub content_type: ContentType,
    pub content_id: i64,
    pub note_id: Option<i64>,
    #[validate(length(min = 1, max = 2000, message = "划线文本长度必须在1-2000个字符之间"))]
    pub text: String,
    #[validate(length(max = 20, message = "颜色值过长"))]
    pub color: Option<String>,
    #[validate(range(min = 0, message = "起始位置不能为负数"))]
    pub start_offset: i32,
    #[validate(range(min = 0, message = "结束位置不能为负数"))]
    pub end_offset: i32,
}

impl CreateHighlightRequest {
    /// 结束位置不能早于起始位置
    pub fn check_range(&self) -> Result<(), ApiError> {
        if self.end_offset < self.start_offset {
            return Err(ApiError::Validation(
                "结束位置不能小于起始位置".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================
// 学习进度
// ============================================

/// 记录学习行为请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrackActivityRequest {
    /// 缺省时由 contentType 推导
    pub activity_type: Option<ActivityType>,
    pub content_type: Option<ContentType>,
    pub content_id: Option<i64>,
    #[validate(range(min = 0, max = 86400, message = "学习时长必须在0-86400秒之间"))]
    pub duration_seconds: Option<i32>,
}

impl TrackActivityRequest {
    /// 确定活动类型：显式指定优先，其次根据内容类型推导
    pub fn resolve_activity_type(&self) -> Result<ActivityType, ApiError> {
        self.activity_type
            .or_else(|| self.content_type.map(|c| c.activity_type()))
            .ok_or_else(|| ApiError::Validation("activityType 或 contentType 必须提供一个".to_string()))
    }
}

/// 历史查询
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub days: Option<i64>,
}

// ============================================
// 推送与引导
// ============================================

/// 浏览器推送订阅的密钥
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// 订阅推送请求（浏览器 PushSubscription.toJSON() 的结构）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    #[validate(url(message = "推送地址必须是有效的URL"))]
    pub endpoint: String,
    pub keys: SubscriptionKeys,
    pub user_agent: Option<String>,
}

/// P-256 未压缩公钥长度
const P256DH_LEN: usize = 65;
/// 推送鉴权密钥长度
const AUTH_SECRET_LEN: usize = 16;

impl SubscribeRequest {
    /// 校验 endpoint 协议与密钥的 base64url 编码和长度
    pub fn check_keys(&self) -> Result<(), ApiError> {
        if !self.endpoint.starts_with("https://") {
            return Err(ApiError::Validation("推送地址必须使用 https".to_string()));
        }
        check_base64url("p256dh", &self.keys.p256dh, P256DH_LEN)?;
        check_base64url("auth", &self.keys.auth, AUTH_SECRET_LEN)?;
        Ok(())
    }
}

fn check_base64url(field: &str, value: &str, expected_len: usize) -> Result<(), ApiError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|_| ApiError::Validation(format!("{} 不是有效的 base64url 编码", field)))?;
    if decoded.len() != expected_len {
        return Err(ApiError::Validation(format!(
            "{} 长度应为 {} 字节，实际为 {}",
            field,
            expected_len,
            decoded.len()
        )));
    }
    Ok(())
}

/// 取消订阅请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeRequest {
    pub endpoint: String,
}

/// 更新新手引导请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuideRequest {
    pub completed: Option<bool>,
    #[validate(range(min = 0, message = "步骤不能为负数"))]
    pub step: Option<i32>,
}

/// 每日汇总任务参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivityCronQuery {
    /// 缺省为昨天（UTC）
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "secret123".to_string(),
            name: "Ada".to_string(),
            native_language: None,
            target_language: None,
            level: None,
        };
        assert!(request.validate().is_err());

        let valid = RegisterRequest {
            email: "ada@example.com".to_string(),
            ..request
        };
        assert!(valid.validate().is_ok());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..valid
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_create_card_box_range() {
        let request = CreateCardRequest {
            front: "apple".to_string(),
            back: "苹果".to_string(),
            example: None,
            box_number: Some(7),
        };
        assert!(request.validate().is_err());

        let valid = CreateCardRequest {
            box_number: Some(3),
            ..request
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_pagination_params_normalized() {
        let params = PaginationParams {
            page: Some(0),
            limit: Some(500),
        };
        let pagination = params.pagination();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, 100);

        let defaults = PaginationParams::default().pagination();
        assert_eq!(defaults.limit, 20);
    }

    #[test]
    fn test_track_activity_type_resolution() {
        let from_content = TrackActivityRequest {
            activity_type: None,
            content_type: Some(ContentType::Episode),
            content_id: Some(3),
            duration_seconds: Some(120),
        };
        assert_eq!(
            from_content.resolve_activity_type().unwrap(),
            ActivityType::Video
        );

        let explicit = TrackActivityRequest {
            activity_type: Some(ActivityType::Review),
            content_type: None,
            content_id: None,
            duration_seconds: None,
        };
        assert_eq!(explicit.resolve_activity_type().unwrap(), ActivityType::Review);

        let missing = TrackActivityRequest {
            activity_type: None,
            content_type: None,
            content_id: None,
            duration_seconds: None,
        };
        assert!(missing.resolve_activity_type().is_err());
    }

    #[test]
    fn test_subscribe_request_key_checks() {
        let p256dh = URL_SAFE_NO_PAD.encode([4u8; 65]);
        let auth = URL_SAFE_NO_PAD.encode([7u8; 16]);
        let request = SubscribeRequest {
            endpoint: "https://fcm.googleapis.com/fcm/send/abc".to_string(),
            keys: SubscriptionKeys {
                p256dh: p256dh.clone(),
                auth: auth.clone(),
            },
            user_agent: None,
        };
        assert!(request.validate().is_ok());
        assert!(request.check_keys().is_ok());

        let short_auth = SubscribeRequest {
            endpoint: request.endpoint.clone(),
            keys: SubscriptionKeys {
                p256dh: p256dh.clone(),
                auth: URL_SAFE_NO_PAD.encode([7u8; 8]),
            },
            user_agent: None,
        };
        assert!(short_auth.check_keys().is_err());

        let plain_http = SubscribeRequest {
            endpoint: "http://push.example.com/abc".to_string(),
            keys: SubscriptionKeys { p256dh, auth },
            user_agent: None,
        };
        assert!(plain_http.check_keys().is_err());
    }

    #[test]
    fn test_highlight_range_check() {
        let request = CreateHighlightRequest {
            content_type: ContentType::Article,
            content_id: 1,
            note_id: None,
            text: "hello".to_string(),
            color: None,
            start_offset: 10,
            end_offset: 5,
        };
        assert!(request.check_range().is_err());
    }
}
