//! 收藏 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use toyshare_marketplace::{MarketError, Toy};

use crate::auth::Claims;
use crate::dto::{ApiResponse, FavoriteStatus, PageResponse, PaginationParams};
use crate::error::Result;
use crate::handlers::toy;
use crate::state::AppState;

/// 当前用户收藏的玩具
///
/// GET /api/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Toy>>>> {
    let user_id = claims.user_id()?;

    let total = state.favorites.count(user_id).await?;
    let items = if total > 0 {
        state
            .favorites
            .list_toys(user_id, pagination.limit(), pagination.offset())
            .await?
    } else {
        Vec::new()
    };

    Ok(Json(ApiResponse::success(PageResponse::new(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))))
}

/// 收藏玩具（重复收藏不报错），他人已下架的玩具视为不存在
///
/// POST /api/favorites/{toy_id}
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(toy_id): Path<i64>,
) -> Result<Json<ApiResponse<FavoriteStatus>>> {
    // 看不到的玩具按不存在处理
    state
        .toys
        .get_toy(toy_id)
        .await?
        .filter(|t| toy::visible_to(t, Some(&claims)))
        .ok_or(MarketError::ToyNotFound(toy_id))?;

    state.favorites.add(claims.user_id()?, toy_id).await?;

    Ok(Json(ApiResponse::success(FavoriteStatus {
        toy_id,
        favorited: true,
    })))
}

/// 取消收藏（未收藏时同样返回成功）
///
/// DELETE /api/favorites/{toy_id}
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(toy_id): Path<i64>,
) -> Result<Json<ApiResponse<FavoriteStatus>>> {
    state.favorites.remove(claims.user_id()?, toy_id).await?;

    Ok(Json(ApiResponse::success(FavoriteStatus {
        toy_id,
        favorited: false,
    })))
}
