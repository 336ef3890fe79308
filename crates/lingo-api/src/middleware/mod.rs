//! 中间件模块
//!
//! 提供用户认证、定时任务鉴权和安全头中间件

mod auth;
mod cron_auth;
mod security;

pub use auth::auth_middleware;
pub use cron_auth::cron_auth_middleware;
pub use security::security_headers;
