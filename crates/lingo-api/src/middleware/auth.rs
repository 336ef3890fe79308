//! JWT 认证中间件
//!
//! 验证请求中的 Bearer Token 并将当前用户注入请求扩展

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::auth::AuthUser;
use crate::state::AppState;

/// 无需登录即可访问的路由
const PUBLIC_PATHS: [&str; 5] = [
    "/api/auth/register",
    "/api/auth/login",
    "/api/push/vapid-public-key",
    "/health",
    "/ready",
];

/// 定时任务路由前缀，由 cron_auth_middleware 单独校验
const CRON_PREFIX: &str = "/api/cron/";

pub(crate) fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || path.starts_with(CRON_PREFIX)
}

/// 从 Authorization 头提取 Bearer Token
pub(crate) fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// 认证中间件
///
/// 公开路由直接放行，其余路由要求有效的 JWT，验证通过后注入 `AuthUser` 和 `Claims`
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let Some(token) = bearer_token(&request) else {
        return unauthorized_response("缺少认证 Token");
    };

    let claims = match state.jwt_manager.verify_token(token) {
        Ok(claims) => claims,
        Err(e) => return unauthorized_response(&e.to_string()),
    };

    let user = match AuthUser::from_claims(&claims) {
        Ok(user) => user,
        Err(e) => return unauthorized_response(&e.to_string()),
    };

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// 生成 401 未授权响应
pub(crate) fn unauthorized_response(message: &str) -> Response {
    let body = json!({
        "success": false,
        "code": "UNAUTHORIZED",
        "message": message,
        "data": null
    });

    (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/api/auth/login"));
        assert!(is_public_path("/api/auth/register"));
        assert!(is_public_path("/api/push/vapid-public-key"));
        assert!(is_public_path("/api/cron/review-reminders"));
        assert!(is_public_path("/health"));

        assert!(!is_public_path("/api/auth/me"));
        assert!(!is_public_path("/api/auth/login-history"));
        assert!(!is_public_path("/api/books"));
        assert!(!is_public_path("/api/cron"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let request = Request::builder()
            .header("Authorization", "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), Some("abc.def.ghi"));

        let basic = Request::builder()
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&basic), None);

        let empty = Request::builder()
            .header("Authorization", "Bearer ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&empty), None);
    }
}
