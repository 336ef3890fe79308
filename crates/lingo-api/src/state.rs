//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use learning::{
    ActivityRepository, ActivityService, CardRepository, NotificationLogRepository,
    PushSubscriptionRepository, ReviewService, UserRepository,
};
use lingo_shared::config::AppConfig;
use lingo_shared::database::Database;
use notification_worker::{DailyActivityJob, PushSender, ReviewReminderJob};
use sqlx::PgPool;

use crate::auth::JwtManager;

pub type ReminderJob = ReviewReminderJob<
    UserRepository,
    PushSubscriptionRepository,
    NotificationLogRepository,
    ActivityRepository,
>;

/// Axum 应用共享状态
///
/// 仓储与服务通过 Arc 在 handler 间共享，内容类资源直接使用连接池查询
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// PostgreSQL 连接池
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub jwt_manager: Arc<JwtManager>,
    pub user_repo: Arc<UserRepository>,
    pub card_repo: Arc<CardRepository>,
    pub push_repo: Arc<PushSubscriptionRepository>,
    pub notification_repo: Arc<NotificationLogRepository>,
    pub review_service: Arc<ReviewService<CardRepository>>,
    pub activity_service: Arc<ActivityService<ActivityRepository>>,
    pub review_reminder_job: Arc<ReminderJob>,
    pub daily_activity_job: Arc<DailyActivityJob<ActivityRepository>>,
}

impl AppState {
    /// 组装仓储、服务和任务
    pub fn new(db: Database, config: AppConfig, sender: Arc<dyn PushSender>) -> Self {
        let pool = db.pool().clone();

        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let card_repo = Arc::new(CardRepository::new(pool.clone()));
        let activity_repo = Arc::new(ActivityRepository::new(pool.clone()));
        let push_repo = Arc::new(PushSubscriptionRepository::new(pool.clone()));
        let notification_repo = Arc::new(NotificationLogRepository::new(pool.clone()));

        let review_reminder_job = Arc::new(ReviewReminderJob::new(
            user_repo.clone(),
            push_repo.clone(),
            notification_repo.clone(),
            activity_repo.clone(),
            sender,
        ));

        Self {
            jwt_manager: Arc::new(JwtManager::new(&config.auth)),
            review_service: Arc::new(ReviewService::new(card_repo.clone())),
            activity_service: Arc::new(ActivityService::new(activity_repo.clone())),
            daily_activity_job: Arc::new(DailyActivityJob::new(activity_repo)),
            review_reminder_job,
            user_repo,
            card_repo,
            push_repo,
            notification_repo,
            config: Arc::new(config),
            pool,
            db,
        }
    }
}
