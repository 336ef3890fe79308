//! 语言学习 HTTP API
//!
//! 面向学习者的 REST API：账号、单词卡复习、视频/播客/文章内容、
//! 笔记与划线、学习进度、Web Push 订阅，以及供外部调度器调用的定时任务端点。
//!
//! ## 模块结构
//!
//! - `auth`: JWT 与密码处理
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型定义
//! - `handlers`: HTTP 请求处理器
//! - `middleware`: 认证、定时任务鉴权、安全头
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use dto::{ApiResponse, PageResponse, PaginationParams};
pub use error::{ApiError, Result};
pub use routes::build_router;
pub use state::AppState;
