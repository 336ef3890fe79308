//! 通知工作者服务
//!
//! 按 cron 表达式周期执行复习提醒和每日学习汇总任务，
//! 通过 Web Push（VAPID）向浏览器推送提醒。

pub mod error;
pub mod jobs;
pub mod scheduler;
pub mod sender;
pub mod templates;
pub mod vapid;

pub use error::{NotificationError, Result};
pub use jobs::{DailyActivityJob, JobReport, ReviewReminderJob, ScheduledJob};
pub use scheduler::Scheduler;
pub use sender::{LogOnlySender, PushMessage, PushSender, SendResult, WebPushSender, build_sender};
