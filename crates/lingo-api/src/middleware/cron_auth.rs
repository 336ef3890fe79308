//! 定时任务鉴权中间件
//!
//! 外部调度器调用 /api/cron/* 时必须携带 `Authorization: Bearer <cron secret>`

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tracing::warn;

use super::auth::{bearer_token, unauthorized_response};
use crate::state::AppState;

/// 比较摘要而非原文，耗时与密钥内容无关
fn secret_matches(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub async fn cron_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let expected = state.config.cron.secret.as_str();
    // 未配置密钥时拒绝所有调用
    if expected.is_empty() {
        warn!(path = %request.uri().path(), "cron.secret 未配置，拒绝定时任务调用");
        return unauthorized_response("定时任务密钥未配置");
    }

    let authorized = bearer_token(&request).is_some_and(|token| secret_matches(token, expected));
    if !authorized {
        return unauthorized_response("无效的定时任务密钥");
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_matches() {
        assert!(secret_matches("cron-secret", "cron-secret"));
        assert!(!secret_matches("cron-secret", "cron-secreT"));
        assert!(!secret_matches("", "cron-secret"));
    }
}
