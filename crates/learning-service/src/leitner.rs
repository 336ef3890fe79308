//! Leitner 间隔重复调度
//!
//! 卡片所在盒子决定复习间隔：`next_review_at = from + 2^box 天`。
//! 记住则升一盒（最高 [`MAX_BOX`]），忘记则回到 0 号盒。

use chrono::{DateTime, Duration, Utc};

use crate::models::Card;

/// 最高盒子编号，对应 64 天的复习间隔
pub const MAX_BOX: i32 = 6;

/// 将盒子编号限制在 `0..=MAX_BOX`
pub fn clamp_box(box_number: i32) -> i32 {
    box_number.clamp(0, MAX_BOX)
}

/// 盒子对应的复习间隔（天）
pub fn interval_days(box_number: i32) -> i64 {
    1i64 << clamp_box(box_number)
}

/// 计算下次复习时间
pub fn next_review_at(from: DateTime<Utc>, box_number: i32) -> DateTime<Utc> {
    from + Duration::days(interval_days(box_number))
}

/// 复习后的新盒子编号
pub fn box_after_review(current: i32, remembered: bool) -> i32 {
    if remembered {
        clamp_box(current.saturating_add(1))
    } else {
        0
    }
}

/// 一次复习的结果，由仓储层持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub box_number: i32,
    pub next_review_at: DateTime<Utc>,
    pub reviewed_at: DateTime<Utc>,
    pub review_count: i32,
    pub correct_count: i32,
}

/// 根据复习结果推进卡片
pub fn apply_review(card: &Card, remembered: bool, now: DateTime<Utc>) -> ReviewOutcome {
    let box_number = box_after_review(card.box_number, remembered);
    ReviewOutcome {
        box_number,
        next_review_at: next_review_at(now, box_number),
        reviewed_at: now,
        review_count: card.review_count + 1,
        correct_count: card.correct_count + i32::from(remembered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn card(box_number: i32) -> Card {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Card {
            id: 1,
            user_id: 1,
            book_id: 1,
            front: "apple".to_string(),
            back: "苹果".to_string(),
            example: None,
            box_number,
            next_review_at: next_review_at(created, box_number),
            last_reviewed_at: None,
            review_count: 3,
            correct_count: 2,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_interval_is_power_of_two() {
        let expected = [1, 2, 4, 8, 16, 32, 64];
        for (box_number, days) in expected.iter().enumerate() {
            assert_eq!(interval_days(box_number as i32), *days);
        }
    }

    #[test]
    fn test_new_card_review_date() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(
            next_review_at(created, 0),
            Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap()
        );
        assert_eq!(
            next_review_at(created, 3),
            Utc.with_ymd_and_hms(2024, 3, 9, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_box_is_clamped() {
        assert_eq!(clamp_box(-3), 0);
        assert_eq!(clamp_box(42), MAX_BOX);
        assert_eq!(interval_days(100), 64);
    }

    #[test]
    fn test_remembered_advances_until_max() {
        assert_eq!(box_after_review(0, true), 1);
        assert_eq!(box_after_review(5, true), 6);
        assert_eq!(box_after_review(MAX_BOX, true), MAX_BOX);
    }

    #[test]
    fn test_forgotten_resets_to_zero() {
        assert_eq!(box_after_review(4, false), 0);
        assert_eq!(box_after_review(0, false), 0);
    }

    #[test]
    fn test_apply_review_counts() {
        let now = Utc.with_ymd_and_hms(2024, 4, 10, 20, 0, 0).unwrap();

        let remembered = apply_review(&card(2), true, now);
        assert_eq!(remembered.box_number, 3);
        assert_eq!(remembered.next_review_at, now + Duration::days(8));
        assert_eq!(remembered.review_count, 4);
        assert_eq!(remembered.correct_count, 3);
        assert_eq!(remembered.reviewed_at, now);

        let forgotten = apply_review(&card(2), false, now);
        assert_eq!(forgotten.box_number, 0);
        assert_eq!(forgotten.next_review_at, now + Duration::days(1));
        assert_eq!(forgotten.review_count, 4);
        assert_eq!(forgotten.correct_count, 2);
    }
}
