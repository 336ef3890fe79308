//! 数据库仓储层
//!
//! 提供学习数据的访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 连接池由调用方显式创建并注入
//! - 定义 trait 接口以支持 mock 测试

mod activity_repo;
mod card_repo;
mod notification_repo;
mod push_repo;
mod traits;
mod user_repo;

pub use activity_repo::ActivityRepository;
pub use card_repo::CardRepository;
pub use notification_repo::NotificationLogRepository;
pub use push_repo::PushSubscriptionRepository;
pub use traits::*;
pub use user_repo::UserRepository;
