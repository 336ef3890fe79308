//! 业务服务层

pub mod activity_service;
pub mod review_service;

pub use activity_service::{ActivityService, AggregateReport, TodayProgress, TrackInput};
pub use review_service::{CreateCardInput, ReviewService};
