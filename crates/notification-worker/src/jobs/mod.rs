//! 定时任务
//!
//! - `review_reminder`: 向有待复习卡片的用户发送推送提醒
//! - `daily_activity`: 将学习行为记录汇总为每日进度

pub mod daily_activity;
pub mod review_reminder;

use async_trait::async_trait;

use crate::error::Result;

pub use daily_activity::DailyActivityJob;
pub use review_reminder::{JobReport, ReviewReminderJob};

/// 可被调度器周期执行的任务
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    /// 任务名称，用于日志和指标标签
    fn name(&self) -> &'static str;

    async fn execute(&self) -> Result<()>;
}
