//! 学习服务领域模型

pub mod activity;
pub mod card;
pub mod content;
pub mod enums;
pub mod note;
pub mod notification;
pub mod user;

pub use activity::{
    ActivityTracking, DailyActivity, NewActivityTracking, TrackedActivity, UserGuide,
};
pub use card::{Book, BookStats, Card, CardUpdate, NewCard};
pub use content::{
    Article, ArticleVocabulary, Episode, Podcast, PodcastVocabulary, Season, Video,
    VideoSubtitle, VideoVocabulary, VocabularyEntry,
};
pub use enums::{
    ActivityType, ContentType, NotificationKind, NotificationStatus, UserRole, VocabularyKind,
};
pub use note::{Highlight, Note};
pub use notification::{
    NewNotificationLog, NewPushSubscription, NotificationLog, PushSubscription,
    ReminderCandidate,
};
pub use user::{NewUser, User, UserProfileUpdate};
