//! 用户资料与可持续积分 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use toyshare_marketplace::{
    MarketError, ProfileChanges, PublicProfile, User,
    dto::{LeaderboardEntry, SustainabilityProfile},
};
use validator::Validate;

use crate::auth::Claims;
use crate::dto::{ApiResponse, LeaderboardQuery, UpdateProfileRequest};
use crate::error::Result;
use crate::state::AppState;

/// 排行榜默认条数
const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

/// 公开资料
///
/// GET /api/users/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PublicProfile>>> {
    let user = state
        .users
        .get_user(id)
        .await?
        .ok_or(MarketError::UserNotFound(id))?;

    Ok(Json(ApiResponse::success(PublicProfile::from(user))))
}

/// 修改自己的资料
///
/// PUT /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>> {
    req.validate()?;

    let user_id = claims.user_id()?;
    let user = state
        .users
        .update_profile(user_id, &ProfileChanges::from(req))
        .await?
        .ok_or(MarketError::UserNotFound(user_id))?;

    Ok(Json(ApiResponse::success(user)))
}

/// 积分档案与徽章进度
///
/// GET /api/users/{id}/sustainability
pub async fn sustainability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<SustainabilityProfile>>> {
    let profile = state.sustainability.profile(id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// 积分排行榜
///
/// GET /api/users/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntry>>>> {
    let entries = state
        .sustainability
        .leaderboard(query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT))
        .await?;

    Ok(Json(ApiResponse::success(entries)))
}
