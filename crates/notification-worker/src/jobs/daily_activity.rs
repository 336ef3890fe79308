//! 每日学习汇总任务
//!
//! 默认汇总前一天（UTC）的学习行为记录，写入每日进度表

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use learning::ActivityService;
use learning::repository::ActivityRepositoryTrait;
use learning::service::AggregateReport;

use super::ScheduledJob;
use crate::error::Result;

/// 每日学习汇总任务
pub struct DailyActivityJob<AR>
where
    AR: ActivityRepositoryTrait,
{
    service: ActivityService<AR>,
}

impl<AR> DailyActivityJob<AR>
where
    AR: ActivityRepositoryTrait,
{
    pub fn new(activity_repo: Arc<AR>) -> Self {
        Self {
            service: ActivityService::new(activity_repo),
        }
    }

    /// 汇总指定日期，缺省为昨天
    pub async fn run(&self, date: Option<NaiveDate>) -> Result<AggregateReport> {
        let date = date.unwrap_or_else(yesterday);
        Ok(self.service.aggregate_date(date).await?)
    }
}

fn yesterday() -> NaiveDate {
    Utc::now().date_naive() - Duration::days(1)
}

#[async_trait]
impl<AR> ScheduledJob for DailyActivityJob<AR>
where
    AR: ActivityRepositoryTrait,
{
    fn name(&self) -> &'static str {
        "daily_activity"
    }

    async fn execute(&self) -> Result<()> {
        self.run(None).await.map(|_| ())
    }
}
