//! 语言学习领域服务
//!
//! 提供单词卡复习、学习进度统计等核心领域逻辑，供 HTTP API 与通知 Worker 共用。
//!
//! ## 核心功能
//!
//! - **Leitner 复习**：卡片按盒子编号分级，复习间隔为 `2^box` 天
//! - **每日进度**：视频、播客、文章、复习四项活动，完成度按 25% 递增
//! - **连续学习天数**：统计截至今天（或昨天）的连续有效学习天数
//! - **字幕解析**：支持 SRT 与 WebVTT 格式
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `leitner`: 间隔重复调度
//! - `progress`: 每日进度与连续天数计算
//! - `pagination`: 分页参数规范化
//! - `subtitles`: 字幕解析与定位
//! - `repository`: 数据库仓储层
//! - `service`: 业务服务层

pub mod error;
pub mod leitner;
pub mod models;
pub mod pagination;
pub mod progress;
pub mod repository;
pub mod service;
pub mod subtitles;

pub use error::{LearningError, Result};
pub use models::*;
pub use pagination::Pagination;
pub use repository::{
    ActivityRepository, CardRepository, NotificationLogRepository, PushSubscriptionRepository,
    UserRepository,
};
pub use service::{ActivityService, ReviewService};
