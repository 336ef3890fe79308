//! 通知服务错误类型
//!
//! 定义推送发送、VAPID 签名、调度配置等场景的错误分类，
//! 便于上层区分可重试的投递失败和需要清理的失效订阅。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("推送发送失败: endpoint={endpoint}, 原因={reason}")]
    SendFailed { endpoint: String, reason: String },

    #[error("推送订阅已失效: {0}")]
    SubscriptionGone(String),

    #[error("VAPID 签名失败: {0}")]
    VapidSigning(String),

    #[error("无效的推送地址: {0}")]
    InvalidEndpoint(String),

    #[error("无效的调度表达式: {0}")]
    InvalidSchedule(String),

    #[error(transparent)]
    Learning(#[from] learning::LearningError),

    #[error(transparent)]
    Shared(#[from] lingo_shared::error::SharedError),
}

pub type Result<T> = std::result::Result<T, NotificationError>;

impl NotificationError {
    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SendFailed { .. } => "PUSH_SEND_FAILED",
            Self::SubscriptionGone(_) => "SUBSCRIPTION_GONE",
            Self::VapidSigning(_) => "VAPID_SIGNING_FAILED",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidSchedule(_) => "INVALID_SCHEDULE",
            Self::Learning(e) => e.error_code(),
            Self::Shared(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let send_err = NotificationError::SendFailed {
            endpoint: "https://push.example.com/abc".to_string(),
            reason: "HTTP 500".to_string(),
        };
        assert_eq!(
            send_err.to_string(),
            "推送发送失败: endpoint=https://push.example.com/abc, 原因=HTTP 500"
        );

        let gone = NotificationError::SubscriptionGone("https://push.example.com/x".to_string());
        assert_eq!(gone.to_string(), "推送订阅已失效: https://push.example.com/x");
    }

    #[test]
    fn test_error_code_delegates_to_source() {
        let err = NotificationError::from(learning::LearningError::UserNotFound(3));
        assert_eq!(err.error_code(), "USER_NOT_FOUND");
        assert_eq!(
            NotificationError::InvalidSchedule("* *".to_string()).error_code(),
            "INVALID_SCHEDULE"
        );
    }
}
