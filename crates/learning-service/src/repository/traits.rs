//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::leitner::ReviewOutcome;
use crate::models::{
    ActivityTracking, Book, BookStats, Card, CardUpdate, DailyActivity, NewActivityTracking,
    NewCard, NewNotificationLog, NewPushSubscription, NewUser, NotificationLog,
    NotificationStatus, PushSubscription, ReminderCandidate, TrackedActivity, User,
    UserProfileUpdate,
};
use crate::pagination::Pagination;
use crate::progress::ActivityFlags;

/// 用户仓储接口
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create(&self, user: &NewUser) -> Result<User>;
    async fn update_profile(&self, id: i64, update: &UserProfileUpdate) -> Result<Option<User>>;

    /// 开启提醒、存在待复习卡片且至少有一个推送订阅的用户
    async fn list_reminder_candidates(&self, now: DateTime<Utc>)
    -> Result<Vec<ReminderCandidate>>;
}

/// 单词本与卡片仓储接口
///
/// 所有查询都带 user_id 条件，其他用户的数据视为不存在
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CardRepositoryTrait: Send + Sync {
    // 单词本
    async fn create_book(
        &self,
        user_id: i64,
        title: &str,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Book>;
    async fn get_book(&self, user_id: i64, id: i64) -> Result<Option<Book>>;
    async fn list_books(&self, user_id: i64) -> Result<Vec<Book>>;
    async fn update_book(
        &self,
        user_id: i64,
        id: i64,
        title: Option<String>,
        description: Option<String>,
        color: Option<String>,
    ) -> Result<Option<Book>>;
    async fn delete_book(&self, user_id: i64, id: i64) -> Result<bool>;
    async fn book_stats(&self, user_id: i64, book_id: i64, now: DateTime<Utc>)
    -> Result<BookStats>;

    // 卡片
    async fn create_card(&self, card: &NewCard) -> Result<Card>;
    async fn get_card(&self, user_id: i64, id: i64) -> Result<Option<Card>>;
    async fn list_cards(
        &self,
        user_id: i64,
        book_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<Card>, i64)>;
    async fn update_card(&self, user_id: i64, id: i64, update: &CardUpdate)
    -> Result<Option<Card>>;
    async fn delete_card(&self, user_id: i64, id: i64) -> Result<bool>;

    // 复习
    async fn save_review(&self, card_id: i64, outcome: &ReviewOutcome) -> Result<Card>;
    async fn list_due_cards(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Card>>;
    async fn count_due(&self, user_id: i64, now: DateTime<Utc>) -> Result<i64>;
    async fn count_cards(&self, user_id: i64) -> Result<i64>;
}

/// 学习进度仓储接口
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ActivityRepositoryTrait: Send + Sync {
    async fn record_tracking(&self, tracking: &NewActivityTracking) -> Result<ActivityTracking>;
    async fn get_daily(&self, user_id: i64, date: NaiveDate) -> Result<Option<DailyActivity>>;

    /// 按 (user_id, date) 写入每日汇总，已有标记不会被清除
    async fn upsert_daily(
        &self,
        user_id: i64,
        date: NaiveDate,
        flags: ActivityFlags,
        progress: i32,
    ) -> Result<DailyActivity>;

    /// `since` 及之后的每日汇总，按日期倒序
    async fn list_daily(&self, user_id: i64, since: NaiveDate) -> Result<Vec<DailyActivity>>;

    /// 进度大于 0 的所有日期，按日期倒序
    async fn active_days(&self, user_id: i64) -> Result<Vec<NaiveDate>>;

    /// 指定日期（UTC）内出现过的 (user_id, activity_type) 组合
    async fn tracked_activities_on(&self, date: NaiveDate) -> Result<Vec<TrackedActivity>>;
}

/// 推送订阅仓储接口
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PushSubscriptionRepositoryTrait: Send + Sync {
    /// endpoint 已存在时更新密钥和归属用户
    async fn upsert(&self, subscription: &NewPushSubscription) -> Result<PushSubscription>;
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<PushSubscription>>;
    async fn delete_for_user(&self, user_id: i64, endpoint: &str) -> Result<bool>;
    async fn delete_by_endpoint(&self, endpoint: &str) -> Result<bool>;
}

/// 通知记录仓储接口
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait NotificationLogRepositoryTrait: Send + Sync {
    async fn create(&self, log: &NewNotificationLog) -> Result<NotificationLog>;
    /// 推送结束后回写最终状态
    async fn update_status(
        &self,
        id: i64,
        status: NotificationStatus,
        error: Option<String>,
    ) -> Result<()>;
    async fn list_for_user(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<(Vec<NotificationLog>, i64)>;
    async fn latest_for_user(&self, user_id: i64) -> Result<Option<NotificationLog>>;
    async fn mark_read(&self, user_id: i64, id: i64) -> Result<Option<NotificationLog>>;
}
