//! 每日学习进度与连续天数
//!
//! 每天四项活动（视频、播客、文章、复习），进度 = round(完成数 / 4 * 100)

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

use crate::models::ActivityType;

/// 每日可追踪的活动总数
pub const TRACKED_ACTIVITY_COUNT: u32 = 4;

/// 完成数对应的进度百分比
pub fn progress_percent(completed: u32) -> i32 {
    let completed = completed.min(TRACKED_ACTIVITY_COUNT);
    (f64::from(completed) / f64::from(TRACKED_ACTIVITY_COUNT) * 100.0).round() as i32
}

/// 某一天的活动完成标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityFlags {
    pub watched_video: bool,
    pub listened_podcast: bool,
    pub read_article: bool,
    pub reviewed_cards: bool,
}

impl ActivityFlags {
    pub fn from_activities<I: IntoIterator<Item = ActivityType>>(activities: I) -> Self {
        let mut flags = Self::default();
        for activity in activities {
            flags.mark(activity);
        }
        flags
    }

    pub fn mark(&mut self, activity: ActivityType) {
        match activity {
            ActivityType::Video => self.watched_video = true,
            ActivityType::Podcast => self.listened_podcast = true,
            ActivityType::Article => self.read_article = true,
            ActivityType::Review => self.reviewed_cards = true,
        }
    }

    pub fn completed(&self) -> u32 {
        [
            self.watched_video,
            self.listened_podcast,
            self.read_article,
            self.reviewed_cards,
        ]
        .iter()
        .filter(|done| **done)
        .count() as u32
    }

    pub fn progress(&self) -> i32 {
        progress_percent(self.completed())
    }
}

/// 连续学习天数
///
/// `active_days` 为进度大于 0 的日期（顺序无关）。今天没有学习时从昨天开始往前数，
/// 保证当天尚未学习时连续记录不会提前中断。
pub fn streak_length(active_days: &[NaiveDate], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = active_days.iter().copied().collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_progress_percent_steps() {
        assert_eq!(progress_percent(0), 0);
        assert_eq!(progress_percent(1), 25);
        assert_eq!(progress_percent(2), 50);
        assert_eq!(progress_percent(3), 75);
        assert_eq!(progress_percent(4), 100);
        assert_eq!(progress_percent(9), 100);
    }

    #[test]
    fn test_flags_are_idempotent() {
        let flags = ActivityFlags::from_activities([
            ActivityType::Video,
            ActivityType::Video,
            ActivityType::Review,
        ]);
        assert!(flags.watched_video);
        assert!(flags.reviewed_cards);
        assert!(!flags.read_article);
        assert_eq!(flags.completed(), 2);
        assert_eq!(flags.progress(), 50);
    }

    #[test]
    fn test_streak_counts_through_today() {
        let days = [day(10), day(9), day(8), day(6)];
        assert_eq!(streak_length(&days, day(10)), 3);
    }

    #[test]
    fn test_streak_starts_yesterday_when_today_empty() {
        let days = [day(9), day(8)];
        assert_eq!(streak_length(&days, day(10)), 2);
    }

    #[test]
    fn test_streak_broken() {
        let days = [day(7), day(6)];
        assert_eq!(streak_length(&days, day(10)), 0);
        assert_eq!(streak_length(&[], day(10)), 0);
    }

    #[test]
    fn test_streak_across_month_boundary() {
        let days = [
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        ];
        assert_eq!(
            streak_length(&days, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            2
        );
    }
}
