//! 会话 Cookie
//!
//! 会话令牌存放在 HttpOnly Cookie 中；API 客户端也可以用 `Authorization: Bearer`

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use toyshare_shared::config::AuthConfig;

/// 构造携带会话令牌的 Cookie
pub fn session_cookie(config: &AuthConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .build()
}

/// 构造用于清除会话的 Cookie（交给 `CookieJar::remove`）
pub fn clear_session_cookie(config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .build()
}

/// 从请求头中提取会话令牌
///
/// Bearer 头优先，其次是会话 Cookie
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    #[test]
    fn test_session_cookie_attributes() {
        let config = AuthConfig::default();
        let cookie = session_cookie(&config, "abc".to_string());

        assert_eq!(cookie.name(), "toyshare_session");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; toyshare_session=tok123"),
        );
        assert_eq!(
            session_token(&headers, "toyshare_session").as_deref(),
            Some("tok123")
        );
    }

    #[test]
    fn test_bearer_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("toyshare_session=from-cookie"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(
            session_token(&headers, "toyshare_session").as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_missing_or_empty_token() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers, "toyshare_session").is_none());

        headers.insert(header::COOKIE, HeaderValue::from_static("toyshare_session="));
        assert!(session_token(&headers, "toyshare_session").is_none());
    }
}
