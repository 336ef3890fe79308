//! 学习服务错误类型
//!
//! 定义领域层的业务错误和系统错误

use thiserror::Error;

/// 学习服务错误类型
#[derive(Debug, Error)]
pub enum LearningError {
    // === 资源不存在 ===
    #[error("用户不存在: {0}")]
    UserNotFound(i64),

    #[error("单词本不存在: {0}")]
    BookNotFound(i64),

    #[error("卡片不存在: {0}")]
    CardNotFound(i64),

    #[error("推送订阅不存在: {0}")]
    SubscriptionNotFound(String),

    #[error("通知不存在: {0}")]
    NotificationNotFound(i64),

    // === 业务错误 ===
    #[error("参数校验失败: {0}")]
    Validation(String),

    #[error("字幕格式错误: 第 {line} 行: {reason}")]
    InvalidSubtitle { line: usize, reason: String },

    #[error("数据冲突: {0}")]
    Conflict(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 学习服务 Result 类型别名
pub type Result<T> = std::result::Result<T, LearningError>;

impl LearningError {
    /// 检查是否为资源不存在错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::BookNotFound(_)
                | Self::CardNotFound(_)
                | Self::SubscriptionNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::Database(sqlx::Error::RowNotFound)
        )
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::BookNotFound(_) => "BOOK_NOT_FOUND",
            Self::CardNotFound(_) => "CARD_NOT_FOUND",
            Self::SubscriptionNotFound(_) => "SUBSCRIPTION_NOT_FOUND",
            Self::NotificationNotFound(_) => "NOTIFICATION_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidSubtitle { .. } => "INVALID_SUBTITLE",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
