//! 徽章等级 API 处理器

use axum::{Json, extract::State};

use crate::dto::{ApiResponse, BadgeTableResponse};
use crate::state::AppState;

/// 徽章等级表及交换奖励积分
///
/// GET /api/badges
pub async fn list_tiers(State(state): State<AppState>) -> Json<ApiResponse<BadgeTableResponse>> {
    Json(ApiResponse::success(BadgeTableResponse {
        tiers: state.badges.tiers().to_vec(),
        owner_points: state.rewards.owner_points,
        requester_points: state.rewards.requester_points,
    }))
}
