//! HTTP 请求处理器模块
//!
//! 包含所有 REST API 端点的处理器实现

pub mod activity;
pub mod articles;
pub mod auth;
pub mod books;
pub mod cards;
pub mod cron;
pub mod dashboard;
pub mod guides;
pub mod health;
pub mod highlights;
pub mod notes;
pub mod notifications;
pub mod podcasts;
pub mod push;
pub mod users;
pub mod videos;
pub mod vocabulary;
