//! 通知模板
//!
//! 根据复习数量、今日进度和连续天数生成提醒的标题和正文。
//! 模板为硬编码文案，客户端展示时直接使用。

use learning::NotificationKind;

use crate::sender::{PushMessage, Urgency};

/// 渲染后的通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

impl RenderedNotification {
    pub fn to_push_message(&self) -> PushMessage {
        PushMessage {
            title: self.title.clone(),
            body: self.body.clone(),
            urgency: match self.kind {
                NotificationKind::ReviewReminder => Urgency::Normal,
                NotificationKind::DailyGoal | NotificationKind::Streak => Urgency::Low,
            },
        }
    }
}

/// 通知模板引擎
pub struct NotificationTemplateEngine;

impl NotificationTemplateEngine {
    /// 待复习提醒
    pub fn review_reminder(name: &str, due_count: i64) -> RenderedNotification {
        let cards = if due_count == 1 { "card is" } else { "cards are" };
        RenderedNotification {
            kind: NotificationKind::ReviewReminder,
            title: "Time to review".to_string(),
            body: format!("{}, {} {} waiting for you.", display_name(name), due_count, cards),
        }
    }

    /// 今日目标未完成提醒
    pub fn daily_goal(progress: i32) -> RenderedNotification {
        RenderedNotification {
            kind: NotificationKind::DailyGoal,
            title: "Daily goal".to_string(),
            body: format!(
                "You're {}% through today's goal. Keep going!",
                progress.clamp(0, 100)
            ),
        }
    }

    /// 连续学习天数
    pub fn streak(days: u32) -> RenderedNotification {
        let unit = if days == 1 { "day" } else { "days" };
        RenderedNotification {
            kind: NotificationKind::Streak,
            title: format!("{}-day streak", days),
            body: format!(
                "You've studied {} {} in a row. Don't break the chain!",
                days, unit
            ),
        }
    }

    /// 组合复习提醒
    ///
    /// 以复习提醒为主体；有连续天数时使用连续天数标题，今日目标未完成时追加进度提示
    pub fn compose_reminder(
        name: &str,
        due_count: i64,
        today_progress: i32,
        streak_days: u32,
    ) -> RenderedNotification {
        let mut notification = Self::review_reminder(name, due_count);

        if streak_days > 0 {
            notification.title = Self::streak(streak_days).title;
        }
        if today_progress < 100 {
            notification.body = format!(
                "{} {}",
                notification.body,
                Self::daily_goal(today_progress).body
            );
        }

        notification
    }
}

fn display_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() { "Hi" } else { trimmed }
}
