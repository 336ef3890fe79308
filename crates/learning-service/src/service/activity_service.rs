//! 学习进度服务
//!
//! 记录学习行为并维护每日汇总，提供今日进度、历史记录和连续学习天数查询

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::models::{ActivityType, ContentType, DailyActivity, NewActivityTracking};
use crate::progress::{self, ActivityFlags};
use crate::repository::ActivityRepositoryTrait;

/// 历史查询的最大天数
pub const MAX_HISTORY_DAYS: i64 = 365;

/// 学习行为
#[derive(Debug, Clone)]
pub struct TrackInput {
    pub activity_type: ActivityType,
    pub content_type: Option<ContentType>,
    pub content_id: Option<i64>,
    pub duration_seconds: i32,
}

/// 今日进度
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayProgress {
    pub date: NaiveDate,
    pub watched_video: bool,
    pub listened_podcast: bool,
    pub read_article: bool,
    pub reviewed_cards: bool,
    pub progress: i32,
}

impl TodayProgress {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            watched_video: false,
            listened_podcast: false,
            read_article: false,
            reviewed_cards: false,
            progress: 0,
        }
    }
}

impl From<&DailyActivity> for TodayProgress {
    fn from(daily: &DailyActivity) -> Self {
        Self {
            date: daily.activity_date,
            watched_video: daily.watched_video,
            listened_podcast: daily.listened_podcast,
            read_article: daily.read_article,
            reviewed_cards: daily.reviewed_cards,
            progress: daily.progress,
        }
    }
}

/// 汇总任务结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub date: Option<NaiveDate>,
    pub users: usize,
    pub failed: usize,
}

/// 学习进度服务
pub struct ActivityService<AR>
where
    AR: ActivityRepositoryTrait,
{
    activity_repo: Arc<AR>,
}

impl<AR> ActivityService<AR>
where
    AR: ActivityRepositoryTrait,
{
    pub fn new(activity_repo: Arc<AR>) -> Self {
        Self { activity_repo }
    }

    /// 今天的日期（UTC）
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// 记录一次学习行为并更新今日汇总
    ///
    /// 同一活动重复记录不会改变进度
    #[instrument(skip(self, input), fields(activity_type = ?input.activity_type))]
    pub async fn track(&self, user_id: i64, input: TrackInput) -> Result<DailyActivity> {
        let now = Utc::now();
        self.activity_repo
            .record_tracking(&NewActivityTracking {
                user_id,
                activity_type: input.activity_type,
                content_type: input.content_type,
                content_id: input.content_id,
                duration_seconds: input.duration_seconds.max(0),
                tracked_at: now,
            })
            .await?;

        let date = now.date_naive();
        let mut flags = self
            .activity_repo
            .get_daily(user_id, date)
            .await?
            .map(|d| flags_of(&d))
            .unwrap_or_default();
        flags.mark(input.activity_type);

        let daily = self
            .activity_repo
            .upsert_daily(user_id, date, flags, flags.progress())
            .await?;

        info!(user_id, progress = daily.progress, "Activity tracked");
        Ok(daily)
    }

    /// 今日进度，没有记录时返回全 0
    pub async fn today_progress(&self, user_id: i64) -> Result<TodayProgress> {
        let today = Self::today();
        let progress = self
            .activity_repo
            .get_daily(user_id, today)
            .await?
            .map(|d| TodayProgress::from(&d))
            .unwrap_or_else(|| TodayProgress::empty(today));
        Ok(progress)
    }

    /// 最近 N 天（含今天）的每日汇总
    pub async fn history(&self, user_id: i64, days: i64) -> Result<Vec<DailyActivity>> {
        let days = days.clamp(1, MAX_HISTORY_DAYS);
        let since = Self::today() - Duration::days(days - 1);
        self.activity_repo.list_daily(user_id, since).await
    }

    /// 连续学习天数
    pub async fn streak(&self, user_id: i64) -> Result<u32> {
        let days = self.activity_repo.active_days(user_id).await?;
        Ok(progress::streak_length(&days, Self::today()))
    }

    /// 将指定日期的行为记录汇总到每日进度
    ///
    /// 单个用户失败只记录日志，不影响其他用户
    #[instrument(skip(self))]
    pub async fn aggregate_date(&self, date: NaiveDate) -> Result<AggregateReport> {
        let rows = self.activity_repo.tracked_activities_on(date).await?;

        let mut per_user: BTreeMap<i64, ActivityFlags> = BTreeMap::new();
        for row in rows {
            per_user.entry(row.user_id).or_default().mark(row.activity_type);
        }

        let mut report = AggregateReport {
            date: Some(date),
            ..Default::default()
        };
        for (user_id, flags) in per_user {
            match self
                .activity_repo
                .upsert_daily(user_id, date, flags, flags.progress())
                .await
            {
                Ok(_) => report.users += 1,
                Err(e) => {
                    warn!(user_id, %date, error = %e, "Failed to aggregate daily activity");
                    report.failed += 1;
                }
            }
        }

        info!(%date, users = report.users, failed = report.failed, "Daily activity aggregated");
        Ok(report)
    }
}

fn flags_of(daily: &DailyActivity) -> ActivityFlags {
    ActivityFlags {
        watched_video: daily.watched_video,
        listened_podcast: daily.listened_podcast,
        read_article: daily.read_article,
        reviewed_cards: daily.reviewed_cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LearningError;
    use crate::models::{ActivityTracking, TrackedActivity};
    use crate::repository::MockActivityRepositoryTrait;
    use mockall::predicate::eq;

    fn daily(user_id: i64, date: NaiveDate, flags: ActivityFlags, progress: i32) -> DailyActivity {
        let now = Utc::now();
        DailyActivity {
            id: 1,
            user_id,
            activity_date: date,
            watched_video: flags.watched_video,
            listened_podcast: flags.listened_podcast,
            read_article: flags.read_article,
            reviewed_cards: flags.reviewed_cards,
            progress,
            created_at: now,
            updated_at: now,
        }
    }

    fn tracking(t: &NewActivityTracking) -> ActivityTracking {
        ActivityTracking {
            id: 1,
            user_id: t.user_id,
            activity_type: t.activity_type,
            content_type: t.content_type,
            content_id: t.content_id,
            duration_seconds: t.duration_seconds,
            tracked_at: t.tracked_at,
            created_at: t.tracked_at,
            updated_at: t.tracked_at,
        }
    }

    fn input(activity_type: ActivityType) -> TrackInput {
        TrackInput {
            activity_type,
            content_type: None,
            content_id: None,
            duration_seconds: 120,
        }
    }

    #[tokio::test]
    async fn test_track_merges_with_existing_day() {
        let mut repo = MockActivityRepositoryTrait::new();
        repo.expect_record_tracking()
            .withf(|t| t.user_id == 5 && t.activity_type == ActivityType::Podcast)
            .returning(|t| Ok(tracking(t)));
        repo.expect_get_daily().returning(|user_id, date| {
            let flags = ActivityFlags {
                watched_video: true,
                ..Default::default()
            };
            Ok(Some(daily(user_id, date, flags, 25)))
        });
        repo.expect_upsert_daily()
            .withf(|_, _, flags, progress| {
                flags.watched_video && flags.listened_podcast && *progress == 50
            })
            .returning(|user_id, date, flags, progress| Ok(daily(user_id, date, flags, progress)));

        let service = ActivityService::new(Arc::new(repo));
        let result = service.track(5, input(ActivityType::Podcast)).await.unwrap();
        assert_eq!(result.progress, 50);
    }

    #[tokio::test]
    async fn test_track_is_idempotent_for_same_activity() {
        let mut repo = MockActivityRepositoryTrait::new();
        repo.expect_record_tracking().returning(|t| Ok(tracking(t)));
        repo.expect_get_daily().returning(|user_id, date| {
            let flags = ActivityFlags {
                reviewed_cards: true,
                ..Default::default()
            };
            Ok(Some(daily(user_id, date, flags, 25)))
        });
        repo.expect_upsert_daily()
            .withf(|_, _, flags, progress| flags.completed() == 1 && *progress == 25)
            .returning(|user_id, date, flags, progress| Ok(daily(user_id, date, flags, progress)));

        let service = ActivityService::new(Arc::new(repo));
        let result = service.track(5, input(ActivityType::Review)).await.unwrap();
        assert_eq!(result.progress, 25);
    }

    #[tokio::test]
    async fn test_today_progress_defaults_to_zero() {
        let mut repo = MockActivityRepositoryTrait::new();
        repo.expect_get_daily().returning(|_, _| Ok(None));

        let service = ActivityService::new(Arc::new(repo));
        let today = service.today_progress(1).await.unwrap();
        assert_eq!(today.progress, 0);
        assert_eq!(today.date, ActivityService::<MockActivityRepositoryTrait>::today());
    }

    #[tokio::test]
    async fn test_history_window_is_clamped() {
        let mut repo = MockActivityRepositoryTrait::new();
        let today = ActivityService::<MockActivityRepositoryTrait>::today();
        repo.expect_list_daily()
            .with(eq(1), eq(today - Duration::days(MAX_HISTORY_DAYS - 1)))
            .returning(|_, _| Ok(vec![]));

        let service = ActivityService::new(Arc::new(repo));
        assert!(service.history(1, 10_000).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_streak_uses_active_days() {
        let mut repo = MockActivityRepositoryTrait::new();
        let today = ActivityService::<MockActivityRepositoryTrait>::today();
        repo.expect_active_days().returning(move |_| {
            Ok(vec![
                today - Duration::days(1),
                today - Duration::days(2),
                today - Duration::days(4),
            ])
        });

        let service = ActivityService::new(Arc::new(repo));
        assert_eq!(service.streak(1).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_aggregate_groups_by_user_and_continues_on_failure() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let mut repo = MockActivityRepositoryTrait::new();
        repo.expect_tracked_activities_on()
            .with(eq(date))
            .returning(|_| {
                Ok(vec![
                    TrackedActivity {
                        user_id: 1,
                        activity_type: ActivityType::Video,
                    },
                    TrackedActivity {
                        user_id: 1,
                        activity_type: ActivityType::Article,
                    },
                    TrackedActivity {
                        user_id: 2,
                        activity_type: ActivityType::Review,
                    },
                ])
            });
        repo.expect_upsert_daily()
            .withf(|user_id, _, _, progress| *user_id == 1 && *progress == 50)
            .times(1)
            .returning(|user_id, date, flags, progress| Ok(daily(user_id, date, flags, progress)));
        repo.expect_upsert_daily()
            .withf(|user_id, _, _, _| *user_id == 2)
            .times(1)
            .returning(|_, _, _, _| Err(LearningError::Internal("db down".to_string())));

        let service = ActivityService::new(Arc::new(repo));
        let report = service.aggregate_date(date).await.unwrap();
        assert_eq!(report.users, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.date, Some(date));
    }
}
