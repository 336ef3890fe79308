//! 学习进度仓储

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::traits::ActivityRepositoryTrait;
use crate::error::Result;
use crate::models::{ActivityTracking, DailyActivity, NewActivityTracking, TrackedActivity};
use crate::progress::ActivityFlags;

const DAILY_COLUMNS: &str = "id, user_id, activity_date, watched_video, listened_podcast, \
     read_article, reviewed_cards, progress, created_at, updated_at";

/// 学习进度仓储
///
/// 负责每日汇总（daily_activities）和原始行为记录（activity_tracking）
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepositoryTrait for ActivityRepository {
    async fn record_tracking(&self, tracking: &NewActivityTracking) -> Result<ActivityTracking> {
        let row = sqlx::query_as::<_, ActivityTracking>(
            r#"
            INSERT INTO activity_tracking
                (user_id, activity_type, content_type, content_id, duration_seconds, tracked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, activity_type, content_type, content_id, duration_seconds,
                      tracked_at, created_at, updated_at
            "#,
        )
        .bind(tracking.user_id)
        .bind(tracking.activity_type)
        .bind(tracking.content_type)
        .bind(tracking.content_id)
        .bind(tracking.duration_seconds)
        .bind(tracking.tracked_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_daily(&self, user_id: i64, date: NaiveDate) -> Result<Option<DailyActivity>> {
        let sql = format!(
            "SELECT {} FROM daily_activities WHERE user_id = $1 AND activity_date = $2",
            DAILY_COLUMNS
        );
        let daily = sqlx::query_as::<_, DailyActivity>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        Ok(daily)
    }

    async fn upsert_daily(
        &self,
        user_id: i64,
        date: NaiveDate,
        flags: ActivityFlags,
        progress: i32,
    ) -> Result<DailyActivity> {
        // 冲突时标记取并集，进度按合并后的标记重算（每项 25）
        let sql = format!(
            r#"
            INSERT INTO daily_activities
                (user_id, activity_date, watched_video, listened_podcast, read_article,
                 reviewed_cards, progress)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, activity_date) DO UPDATE
            SET watched_video = daily_activities.watched_video OR EXCLUDED.watched_video,
                listened_podcast = daily_activities.listened_podcast OR EXCLUDED.listened_podcast,
                read_article = daily_activities.read_article OR EXCLUDED.read_article,
                reviewed_cards = daily_activities.reviewed_cards OR EXCLUDED.reviewed_cards,
                progress = (
                    (daily_activities.watched_video OR EXCLUDED.watched_video)::int
                    + (daily_activities.listened_podcast OR EXCLUDED.listened_podcast)::int
                    + (daily_activities.read_article OR EXCLUDED.read_article)::int
                    + (daily_activities.reviewed_cards OR EXCLUDED.reviewed_cards)::int
                ) * 25,
                updated_at = NOW()
            RETURNING {}
            "#,
            DAILY_COLUMNS
        );
        let daily = sqlx::query_as::<_, DailyActivity>(&sql)
            .bind(user_id)
            .bind(date)
            .bind(flags.watched_video)
            .bind(flags.listened_podcast)
            .bind(flags.read_article)
            .bind(flags.reviewed_cards)
            .bind(progress)
            .fetch_one(&self.pool)
            .await?;

        Ok(daily)
    }

    async fn list_daily(&self, user_id: i64, since: NaiveDate) -> Result<Vec<DailyActivity>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM daily_activities
            WHERE user_id = $1 AND activity_date >= $2
            ORDER BY activity_date DESC
            "#,
            DAILY_COLUMNS
        );
        let rows = sqlx::query_as::<_, DailyActivity>(&sql)
            .bind(user_id)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn active_days(&self, user_id: i64) -> Result<Vec<NaiveDate>> {
        let days: Vec<(NaiveDate,)> = sqlx::query_as(
            r#"
            SELECT activity_date
            FROM daily_activities
            WHERE user_id = $1 AND progress > 0
            ORDER BY activity_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(days.into_iter().map(|(d,)| d).collect())
    }

    async fn tracked_activities_on(&self, date: NaiveDate) -> Result<Vec<TrackedActivity>> {
        let rows = sqlx::query_as::<_, TrackedActivity>(
            r#"
            SELECT DISTINCT user_id, activity_type
            FROM activity_tracking
            WHERE (tracked_at AT TIME ZONE 'UTC')::date = $1
            ORDER BY user_id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
