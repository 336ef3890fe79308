//! Web Push 发送器
//!
//! 通过 `PushSender` trait 抽象发送行为：`WebPushSender` 直接调用浏览器推送服务，
//! `LogOnlySender` 在未配置 VAPID 密钥时仅记录日志。
//!
//! 推送不携带加密负载，客户端收到后通过 `/api/notifications/latest` 拉取内容。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use learning::PushSubscription;
use lingo_shared::config::PushConfig;
use lingo_shared::observability::metrics;
use reqwest::{Client, StatusCode, header};
use tracing::{info, warn};

use crate::error::{NotificationError, Result};
use crate::vapid::VapidSigner;

/// 推送紧急程度，对应 `Urgency` 头
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Urgency {
    VeryLow,
    Low,
    #[default]
    Normal,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "very-low",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// 推送消息
///
/// 标题和正文写入通知记录，推送本身不携带负载
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub urgency: Urgency,
}

/// 发送结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    /// 推送服务已接收
    Delivered,
    /// 订阅已失效（404/410），调用方应删除订阅
    Gone,
    /// 其他失败，保留订阅
    Failed(String),
}

impl SendResult {
    /// 根据推送服务的 HTTP 状态码归类
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            200 | 201 | 202 => Self::Delivered,
            404 | 410 => Self::Gone,
            other => Self::Failed(format!("push service responded with HTTP {}", other)),
        }
    }

    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Delivered => "sent",
            Self::Gone => "gone",
            Self::Failed(_) => "failed",
        }
    }
}

/// 推送发送器 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, subscription: &PushSubscription, message: &PushMessage) -> SendResult;

    /// 发送器名称，用于日志
    fn name(&self) -> &'static str;
}

/// 根据配置选择发送器
pub fn build_sender(config: &PushConfig) -> Result<Arc<dyn PushSender>> {
    if !config.vapid_configured() {
        warn!("VAPID keys not configured, push notifications will only be logged");
        return Ok(Arc::new(LogOnlySender));
    }

    let signer = VapidSigner::new(
        &config.vapid_private_key_pem,
        &config.vapid_public_key,
        &config.subject,
    )?;
    Ok(Arc::new(WebPushSender::new(
        signer,
        config.ttl_seconds,
        Duration::from_secs(config.request_timeout_seconds),
    )?))
}

// ---------------------------------------------------------------------------
// Web Push 发送器
// ---------------------------------------------------------------------------

/// 基于 VAPID 的 Web Push 发送器
pub struct WebPushSender {
    client: Client,
    signer: VapidSigner,
    ttl_seconds: u32,
}

impl WebPushSender {
    pub fn new(signer: VapidSigner, ttl_seconds: u32, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            NotificationError::SendFailed {
                endpoint: String::new(),
                reason: format!("failed to build http client: {}", e),
            }
        })?;

        Ok(Self {
            client,
            signer,
            ttl_seconds,
        })
    }

    async fn post(&self, endpoint: &str, urgency: Urgency) -> Result<StatusCode> {
        let authorization = self.signer.authorization(endpoint, Utc::now())?;

        let response = self
            .client
            .post(endpoint)
            .header("TTL", self.ttl_seconds.to_string())
            .header("Urgency", urgency.as_str())
            .header(header::AUTHORIZATION, authorization)
            .header(header::CONTENT_LENGTH, "0")
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        Ok(response.status())
    }
}

#[async_trait]
impl PushSender for WebPushSender {
    async fn send(&self, subscription: &PushSubscription, message: &PushMessage) -> SendResult {
        let result = match self.post(&subscription.endpoint, message.urgency).await {
            Ok(status) => SendResult::from_status(status),
            Err(e) => SendResult::Failed(e.to_string()),
        };

        metrics::record_push_notification(result.metric_label());
        match &result {
            SendResult::Delivered => info!(
                user_id = subscription.user_id,
                subscription_id = subscription.id,
                title = %message.title,
                "Push delivered"
            ),
            SendResult::Gone => info!(
                user_id = subscription.user_id,
                subscription_id = subscription.id,
                "Push subscription gone"
            ),
            SendResult::Failed(reason) => warn!(
                user_id = subscription.user_id,
                subscription_id = subscription.id,
                reason = %reason,
                "Push delivery failed"
            ),
        }
        result
    }

    fn name(&self) -> &'static str {
        "web-push"
    }
}

// ---------------------------------------------------------------------------
// 仅记录日志的发送器
// ---------------------------------------------------------------------------

/// 未配置 VAPID 时使用，仅记录日志并视为发送成功
pub struct LogOnlySender;

#[async_trait]
impl PushSender for LogOnlySender {
    async fn send(&self, subscription: &PushSubscription, message: &PushMessage) -> SendResult {
        info!(
            user_id = subscription.user_id,
            subscription_id = subscription.id,
            title = %message.title,
            body = %message.body,
            "模拟发送推送通知"
        );
        metrics::record_push_notification("sent");
        SendResult::Delivered
    }

    fn name(&self) -> &'static str {
        "log-only"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription() -> PushSubscription {
        let now = Utc::now();
        PushSubscription {
            id: 1,
            user_id: 10,
            endpoint: "https://push.example.com/send/abc".to_string(),
            p256dh: "BPk".to_string(),
            auth: "secret".to_string(),
            user_agent: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(SendResult::from_status(StatusCode::CREATED), SendResult::Delivered);
        assert_eq!(SendResult::from_status(StatusCode::OK), SendResult::Delivered);
        assert_eq!(SendResult::from_status(StatusCode::ACCEPTED), SendResult::Delivered);
        assert_eq!(SendResult::from_status(StatusCode::GONE), SendResult::Gone);
        assert_eq!(SendResult::from_status(StatusCode::NOT_FOUND), SendResult::Gone);
        assert!(matches!(
            SendResult::from_status(StatusCode::TOO_MANY_REQUESTS),
            SendResult::Failed(_)
        ));
        assert!(matches!(
            SendResult::from_status(StatusCode::BAD_REQUEST),
            SendResult::Failed(_)
        ));
    }

    #[test]
    fn test_urgency_header_values() {
        assert_eq!(Urgency::default().as_str(), "normal");
        assert_eq!(Urgency::VeryLow.as_str(), "very-low");
    }

    #[test]
    fn test_build_sender_without_vapid_is_log_only() {
        let sender = build_sender(&PushConfig::default()).unwrap();
        assert_eq!(sender.name(), "log-only");
    }

    #[test]
    fn test_build_sender_with_bad_key_fails() {
        let config = PushConfig {
            vapid_public_key: "BPub".to_string(),
            vapid_private_key_pem: "not a pem".to_string(),
            ..Default::default()
        };
        assert!(build_sender(&config).is_err());
    }

    #[tokio::test]
    async fn test_log_only_sender_delivers() {
        let message = PushMessage {
            title: "Time to review".to_string(),
            body: "You have 3 cards waiting".to_string(),
            urgency: Urgency::Normal,
        };
        let result = LogOnlySender.send(&subscription(), &message).await;
        assert_eq!(result, SendResult::Delivered);
    }
}
