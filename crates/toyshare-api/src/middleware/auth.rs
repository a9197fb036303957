//! 会话认证中间件
//!
//! 从 Bearer 头或会话 Cookie 中取出令牌，验证后把 Claims 注入请求扩展。
//! 公开路由在携带有效令牌时同样注入 Claims（如浏览自己的下架玩具），
//! 令牌缺失或无效时按匿名访问处理。

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::auth::{Claims, session_token};
use crate::state::AppState;

/// 公开路由表（方法 + 路径模板）
///
/// 模板中的 `{id}` 只匹配数字段，因此 `/api/toys/mine` 不会被 `/api/toys/{id}` 放行
const PUBLIC_ROUTES: &[(Method, &str)] = &[
    (Method::POST, "/api/auth/register"),
    (Method::POST, "/api/auth/login"),
    (Method::POST, "/api/auth/logout"),
    (Method::GET, "/api/toys"),
    (Method::GET, "/api/toys/{id}"),
    (Method::GET, "/api/badges"),
    (Method::GET, "/api/users/leaderboard"),
    (Method::GET, "/api/users/{id}"),
    (Method::GET, "/api/users/{id}/sustainability"),
    (Method::GET, "/api/wishes"),
    (Method::POST, "/api/contact-messages"),
];

/// 判断请求是否无需登录
///
/// `/api` 之外的路径（探针）和 CORS 预检一律放行
pub fn is_public(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS || !path.starts_with("/api/") {
        return true;
    }
    let path = path.trim_end_matches('/');
    PUBLIC_ROUTES
        .iter()
        .any(|(m, pattern)| m == method && matches_pattern(pattern, path))
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some("{id}"), Some(seg)) => {
                if seg.is_empty() || !seg.bytes().all(|b| b.is_ascii_digit()) {
                    return false;
                }
            }
            (Some(p), Some(seg)) if p == seg => {}
            _ => return false,
        }
    }
}

/// 认证中间件
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let public = is_public(request.method(), request.uri().path());
    let token = session_token(request.headers(), &state.auth.cookie_name);

    let Some(token) = token else {
        if public {
            return next.run(request).await;
        }
        return unauthorized_response("请先登录");
    };

    match state.jwt_manager.verify_token(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(_) if public => next.run(request).await,
        Err(e) => unauthorized_response(&e.to_string()),
    }
}

/// 管理员路由守卫，需放在 auth_middleware 之后
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<Claims>() {
        None => unauthorized_response("请先登录"),
        Some(claims) if claims.is_admin() => next.run(request).await,
        Some(_) => forbidden_response("需要管理员权限"),
    }
}

/// 生成 401 未授权响应
fn unauthorized_response(message: &str) -> Response {
    let body = json!({
        "success": false,
        "code": "UNAUTHORIZED",
        "message": message,
        "data": null
    });

    (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}

fn forbidden_response(message: &str) -> Response {
    let body = json!({
        "success": false,
        "code": "FORBIDDEN",
        "message": message,
        "data": null
    });

    (StatusCode::FORBIDDEN, axum::Json(body)).into_response()
}
