//! 复习提醒任务
//!
//! 找出开启提醒、有待复习卡片且已订阅推送的用户，逐个向其所有订阅发送推送。
//! 单个用户失败只记录日志，不中断整批任务；失效的订阅会被删除。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use learning::progress;
use learning::repository::{
    ActivityRepositoryTrait, NotificationLogRepositoryTrait, PushSubscriptionRepositoryTrait,
    UserRepositoryTrait,
};
use learning::{NewNotificationLog, NotificationStatus, ReminderCandidate};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::ScheduledJob;
use crate::error::Result;
use crate::sender::{PushSender, SendResult};
use crate::templates::NotificationTemplateEngine;

/// 任务执行结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub users_considered: usize,
    pub notified: usize,
    pub failed: usize,
    pub subscriptions_removed: usize,
}

/// 单个用户的发送结果
#[derive(Debug, Default)]
struct UserDelivery {
    delivered: usize,
    removed: usize,
}

/// 复习提醒任务
pub struct ReviewReminderJob<UR, PR, NR, AR>
where
    UR: UserRepositoryTrait,
    PR: PushSubscriptionRepositoryTrait,
    NR: NotificationLogRepositoryTrait,
    AR: ActivityRepositoryTrait,
{
    user_repo: Arc<UR>,
    push_repo: Arc<PR>,
    log_repo: Arc<NR>,
    activity_repo: Arc<AR>,
    sender: Arc<dyn PushSender>,
}

impl<UR, PR, NR, AR> ReviewReminderJob<UR, PR, NR, AR>
where
    UR: UserRepositoryTrait,
    PR: PushSubscriptionRepositoryTrait,
    NR: NotificationLogRepositoryTrait,
    AR: ActivityRepositoryTrait,
{
    pub fn new(
        user_repo: Arc<UR>,
        push_repo: Arc<PR>,
        log_repo: Arc<NR>,
        activity_repo: Arc<AR>,
        sender: Arc<dyn PushSender>,
    ) -> Self {
        Self {
            user_repo,
            push_repo,
            log_repo,
            activity_repo,
            sender,
        }
    }

    pub async fn run(&self) -> Result<JobReport> {
        self.run_at(Utc::now()).await
    }

    /// 以指定时间为基准执行
    #[instrument(skip(self), fields(sender = self.sender.name()))]
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<JobReport> {
        let candidates = self.user_repo.list_reminder_candidates(now).await?;

        let mut report = JobReport {
            users_considered: candidates.len(),
            ..Default::default()
        };

        // 逐个用户顺序发送
        for candidate in &candidates {
            match self.notify_user(candidate, now).await {
                Ok(delivery) => {
                    report.subscriptions_removed += delivery.removed;
                    if delivery.delivered > 0 {
                        report.notified += 1;
                    } else {
                        report.failed += 1;
                    }
                }
                Err(e) => {
                    warn!(user_id = candidate.user_id, error = %e, "Failed to send review reminder");
                    report.failed += 1;
                }
            }
        }

        info!(
            users_considered = report.users_considered,
            notified = report.notified,
            failed = report.failed,
            subscriptions_removed = report.subscriptions_removed,
            "Review reminders sent"
        );
        Ok(report)
    }

    async fn notify_user(
        &self,
        candidate: &ReminderCandidate,
        now: DateTime<Utc>,
    ) -> Result<UserDelivery> {
        let user_id = candidate.user_id;
        let subscriptions = self.push_repo.list_for_user(user_id).await?;

        let today = now.date_naive();
        let today_progress = self
            .activity_repo
            .get_daily(user_id, today)
            .await?
            .map(|d| d.progress)
            .unwrap_or(0);
        let active_days = self.activity_repo.active_days(user_id).await?;
        let streak = progress::streak_length(&active_days, today);

        let rendered = NotificationTemplateEngine::compose_reminder(
            &candidate.name,
            candidate.due_count,
            today_progress,
            streak,
        );
        let message = rendered.to_push_message();

        // 推送不带内容，客户端收到后拉取最新通知，记录必须先于推送写入
        let log = self
            .log_repo
            .create(&NewNotificationLog {
                user_id,
                kind: rendered.kind,
                title: rendered.title,
                body: rendered.body,
                status: NotificationStatus::Pending,
                error: None,
            })
            .await?;

        let mut delivery = UserDelivery::default();
        let mut errors = Vec::new();
        for subscription in &subscriptions {
            match self.sender.send(subscription, &message).await {
                SendResult::Delivered => delivery.delivered += 1,
                SendResult::Gone => {
                    match self.push_repo.delete_by_endpoint(&subscription.endpoint).await {
                        Ok(true) => delivery.removed += 1,
                        Ok(false) => {}
                        Err(e) => warn!(
                            user_id,
                            subscription_id = subscription.id,
                            error = %e,
                            "Failed to delete gone subscription"
                        ),
                    }
                }
                SendResult::Failed(reason) => errors.push(reason),
            }
        }

        let (status, error) = if delivery.delivered > 0 {
            (NotificationStatus::Sent, None)
        } else if errors.is_empty() {
            (
                NotificationStatus::Failed,
                Some("no active subscriptions".to_string()),
            )
        } else {
            (NotificationStatus::Failed, Some(errors.join("; ")))
        };

        if let Err(e) = self.log_repo.update_status(log.id, status, error).await {
            warn!(user_id, log_id = log.id, error = %e, "Failed to finalize notification log");
        }

        Ok(delivery)
    }
}

#[async_trait]
impl<UR, PR, NR, AR> ScheduledJob for ReviewReminderJob<UR, PR, NR, AR>
where
    UR: UserRepositoryTrait,
    PR: PushSubscriptionRepositoryTrait,
    NR: NotificationLogRepositoryTrait,
    AR: ActivityRepositoryTrait,
{
    fn name(&self) -> &'static str {
        "review_reminder"
    }

    async fn execute(&self) -> Result<()> {
        self.run().await.map(|_| ())
    }
}
