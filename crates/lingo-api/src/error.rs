//! HTTP 接口错误类型定义
//!
//! 处理器边界的统一错误，负责映射 HTTP 状态码和稳定的错误码

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use learning::LearningError;
use notification_worker::NotificationError;
use serde_json::json;

/// PostgreSQL 唯一约束冲突
const PG_UNIQUE_VIOLATION: &str = "23505";

/// 接口错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("禁止访问: {0}")]
    Forbidden(String),
    #[error("邮箱或密码错误")]
    InvalidCredentials,
    #[error("邮箱已被注册")]
    EmailTaken,

    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("字幕格式错误: {0}")]
    InvalidSubtitle(String),

    // 资源不存在
    #[error("用户不存在: {0}")]
    UserNotFound(i64),
    #[error("单词本不存在: {0}")]
    BookNotFound(i64),
    #[error("卡片不存在: {0}")]
    CardNotFound(i64),
    #[error("视频不存在: {0}")]
    VideoNotFound(i64),
    #[error("季不存在: {0}")]
    SeasonNotFound(i64),
    #[error("剧集不存在: {0}")]
    EpisodeNotFound(i64),
    #[error("播客不存在: {0}")]
    PodcastNotFound(i64),
    #[error("文章不存在: {0}")]
    ArticleNotFound(i64),
    #[error("词汇不存在: {0}")]
    VocabularyNotFound(i64),
    #[error("笔记不存在: {0}")]
    NoteNotFound(i64),
    #[error("划线不存在: {0}")]
    HighlightNotFound(i64),
    #[error("通知不存在: {0}")]
    NotificationNotFound(i64),
    #[error("资源不存在: {0}")]
    NotFound(String),

    // 业务错误
    #[error("数据冲突: {0}")]
    Conflict(String),

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,

            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSubtitle(_) => StatusCode::UNPROCESSABLE_ENTITY,

            Self::UserNotFound(_)
            | Self::BookNotFound(_)
            | Self::CardNotFound(_)
            | Self::VideoNotFound(_)
            | Self::SeasonNotFound(_)
            | Self::EpisodeNotFound(_)
            | Self::PodcastNotFound(_)
            | Self::ArticleNotFound(_)
            | Self::VocabularyNotFound(_)
            | Self::NoteNotFound(_)
            | Self::HighlightNotFound(_)
            | Self::NotificationNotFound(_)
            | Self::NotFound(_) => StatusCode::NOT_FOUND,

            Self::EmailTaken | Self::Conflict(_) => StatusCode::CONFLICT,

            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidSubtitle(_) => "INVALID_SUBTITLE",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::BookNotFound(_) => "BOOK_NOT_FOUND",
            Self::CardNotFound(_) => "CARD_NOT_FOUND",
            Self::VideoNotFound(_) => "VIDEO_NOT_FOUND",
            Self::SeasonNotFound(_) => "SEASON_NOT_FOUND",
            Self::EpisodeNotFound(_) => "EPISODE_NOT_FOUND",
            Self::PodcastNotFound(_) => "PODCAST_NOT_FOUND",
            Self::ArticleNotFound(_) => "ARTICLE_NOT_FOUND",
            Self::VocabularyNotFound(_) => "VOCABULARY_NOT_FOUND",
            Self::NoteNotFound(_) => "NOTE_NOT_FOUND",
            Self::HighlightNotFound(_) => "HIGHLIGHT_NOT_FOUND",
            Self::NotificationNotFound(_) => "NOTIFICATION_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 从数据库错误转换
///
/// 记录不存在映射为 404，唯一约束冲突映射为 409
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound("记录不存在".to_string()),
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) =>
            {
                Self::Conflict(db_err.message().to_string())
            }
            _ => Self::Database(err),
        }
    }
}

/// 从 learning-service 的错误转换
impl From<LearningError> for ApiError {
    fn from(err: LearningError) -> Self {
        match err {
            LearningError::UserNotFound(id) => Self::UserNotFound(id),
            LearningError::BookNotFound(id) => Self::BookNotFound(id),
            LearningError::CardNotFound(id) => Self::CardNotFound(id),
            LearningError::NotificationNotFound(id) => Self::NotificationNotFound(id),
            LearningError::SubscriptionNotFound(endpoint) => {
                Self::NotFound(format!("推送订阅 {}", endpoint))
            }
            LearningError::Validation(msg) => Self::Validation(msg),
            invalid @ LearningError::InvalidSubtitle { .. } => {
                Self::InvalidSubtitle(invalid.to_string())
            }
            LearningError::Conflict(msg) => Self::Conflict(msg),
            LearningError::Database(e) => Self::from(e),
            LearningError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// 从通知服务错误转换
impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Learning(e) => Self::from(e),
            NotificationError::InvalidEndpoint(endpoint) => {
                Self::Validation(format!("无效的推送地址: {}", endpoint))
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

/// 接口层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn all_error_variants() -> Vec<(ApiError, StatusCode, &'static str)> {
        vec![
            (ApiError::Unauthorized("token expired".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (ApiError::Forbidden("admin only".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            (ApiError::EmailTaken, StatusCode::CONFLICT, "EMAIL_TAKEN"),
            (ApiError::Validation("front is required".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (ApiError::InvalidSubtitle("line 3".into()), StatusCode::UNPROCESSABLE_ENTITY, "INVALID_SUBTITLE"),
            (ApiError::UserNotFound(1), StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            (ApiError::BookNotFound(2), StatusCode::NOT_FOUND, "BOOK_NOT_FOUND"),
            (ApiError::CardNotFound(3), StatusCode::NOT_FOUND, "CARD_NOT_FOUND"),
            (ApiError::VideoNotFound(4), StatusCode::NOT_FOUND, "VIDEO_NOT_FOUND"),
            (ApiError::SeasonNotFound(5), StatusCode::NOT_FOUND, "SEASON_NOT_FOUND"),
            (ApiError::EpisodeNotFound(6), StatusCode::NOT_FOUND, "EPISODE_NOT_FOUND"),
            (ApiError::PodcastNotFound(7), StatusCode::NOT_FOUND, "PODCAST_NOT_FOUND"),
            (ApiError::ArticleNotFound(8), StatusCode::NOT_FOUND, "ARTICLE_NOT_FOUND"),
            (ApiError::VocabularyNotFound(9), StatusCode::NOT_FOUND, "VOCABULARY_NOT_FOUND"),
            (ApiError::NoteNotFound(10), StatusCode::NOT_FOUND, "NOTE_NOT_FOUND"),
            (ApiError::HighlightNotFound(11), StatusCode::NOT_FOUND, "HIGHLIGHT_NOT_FOUND"),
            (ApiError::NotificationNotFound(12), StatusCode::NOT_FOUND, "NOTIFICATION_NOT_FOUND"),
            (ApiError::NotFound("guide".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ApiError::Conflict("duplicate".into()), StatusCode::CONFLICT, "CONFLICT"),
            (ApiError::Internal("unexpected".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ]
    }

    #[test]
    fn test_all_variants_status_and_code() {
        for (error, expected_status, expected_code) in all_error_variants() {
            assert_eq!(error.status_code(), expected_status, "状态码不匹配: {expected_code}");
            assert_eq!(error.error_code(), expected_code);
        }
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_database_errors_map_to_500() {
        let err = ApiError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_learning_error_conversion() {
        assert_eq!(
            ApiError::from(LearningError::CardNotFound(5)).error_code(),
            "CARD_NOT_FOUND"
        );
        assert_eq!(
            ApiError::from(LearningError::Validation("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        let subtitle = ApiError::from(LearningError::InvalidSubtitle {
            line: 4,
            reason: "bad timing".into(),
        });
        assert_eq!(subtitle.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(subtitle.to_string().contains("bad timing"));
        assert_eq!(
            ApiError::from(LearningError::Database(sqlx::Error::RowNotFound)).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_notification_error_conversion() {
        let err = ApiError::from(NotificationError::Learning(LearningError::UserNotFound(3)));
        assert_eq!(err.error_code(), "USER_NOT_FOUND");

        let err = ApiError::from(NotificationError::VapidSigning("bad key".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_into_response_body_structure() {
        for (error, expected_status, expected_code) in all_error_variants() {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);

            let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("读取响应体失败");
            let body: serde_json::Value =
                serde_json::from_slice(&body_bytes).expect("响应体不是合法 JSON");

            assert_eq!(body["success"], json!(false));
            assert_eq!(body["code"], json!(expected_code));
            assert!(!body["message"].as_str().unwrap_or("").is_empty());
            assert!(body["data"].is_null());
        }
    }

    #[tokio::test]
    async fn test_system_errors_hide_internal_details() {
        let response = ApiError::Internal("stack overflow at module X".into()).into_response();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert!(!body["message"].as_str().unwrap().contains("stack overflow"));
    }
}
