//! 认证相关的 HTTP 处理器
//!
//! 注册、登录、登出和当前用户

use axum::{Extension, Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use toyshare_marketplace::{MarketError, NewUser, User};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{Claims, clear_session_cookie, hash_password, session_cookie, verify_password};
use crate::dto::{ApiResponse, CurrentUserResponse, LoginRequest, RegisterRequest, SessionResponse};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 签发令牌并写入会话 Cookie
fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: User,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>)> {
    let (token, expires_at) = state.jwt_manager.generate_token(&user)?;
    let jar = jar.add(session_cookie(&state.auth, token.clone()));

    Ok((
        jar,
        Json(ApiResponse::success(SessionResponse {
            token,
            expires_at,
            user,
        })),
    ))
}

/// 注册
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>)> {
    req.validate()?;

    let new_user = NewUser {
        username: req.username.trim().to_string(),
        email: req.email.trim().to_lowercase(),
        password_hash: hash_password(&req.password)?,
        display_name: req.display_name.filter(|s| !s.trim().is_empty()),
        location: req.location.filter(|s| !s.trim().is_empty()),
        initial_badge: state.badges.badge_for(0).name.clone(),
    };

    let user = state.users.create_user(&new_user).await?;
    info!(user_id = user.id, username = %user.username, "用户注册成功");

    start_session(&state, jar, user)
}

/// 登录（用户名或邮箱）
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>)> {
    req.validate()?;

    let user = state
        .users
        .find_by_login(req.login.trim())
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = user.id, "登录失败：密码错误");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = user.id, "用户登录成功");
    start_session(&state, jar, user)
}

/// 登出：清除会话 Cookie
///
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    let jar = jar.remove(clear_session_cookie(&state.auth));
    (jar, Json(ApiResponse::<()>::success_empty()))
}

/// 当前登录用户及徽章进度
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<CurrentUserResponse>>> {
    let user_id = claims.user_id()?;
    let user = state
        .users
        .get_user(user_id)
        .await?
        .ok_or(MarketError::UserNotFound(user_id))?;

    let progress = state.badges.progress(user.sustainability_score);
    Ok(Json(ApiResponse::success(CurrentUserResponse {
        user,
        progress,
    })))
}
