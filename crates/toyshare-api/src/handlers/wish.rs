//! 心愿单 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use toyshare_marketplace::{MarketError, Wish, WishDraft};
use validator::Validate;

use crate::auth::Claims;
use crate::dto::{
    ApiResponse, DeletedResponse, PageResponse, PaginationParams, WishQueryFilter, WishRequest,
};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 心愿列表，可按用户过滤
///
/// GET /api/wishes
pub async fn list_wishes(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<WishQueryFilter>,
) -> Result<Json<ApiResponse<PageResponse<Wish>>>> {
    let total = state.wishes.count(filter.user_id).await?;
    let items = if total > 0 {
        state
            .wishes
            .list(filter.user_id, pagination.limit(), pagination.offset())
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

/// 发布心愿
///
/// POST /api/wishes
pub async fn create_wish(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<WishRequest>,
) -> Result<Json<ApiResponse<Wish>>> {
    req.validate()?;

    let wish = state
        .wishes
        .create(claims.user_id()?, &WishDraft::from(req))
        .await?;

    Ok(Json(ApiResponse::success(wish)))
}

/// 修改自己的心愿
///
/// PUT /api/wishes/{id}
pub async fn update_wish(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(req): Json<WishRequest>,
) -> Result<Json<ApiResponse<Wish>>> {
    req.validate()?;
    owned_wish(&state, &claims, id).await?;

    let wish = state
        .wishes
        .update(id, &WishDraft::from(req))
        .await?
        .ok_or(MarketError::WishNotFound(id))?;

    Ok(Json(ApiResponse::success(wish)))
}

/// 删除自己的心愿
///
/// DELETE /api/wishes/{id}
pub async fn delete_wish(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedResponse>>> {
    owned_wish(&state, &claims, id).await?;

    if !state.wishes.delete(id).await? {
        return Err(MarketError::WishNotFound(id).into());
    }

    Ok(Json(ApiResponse::success(DeletedResponse::success())))
}

async fn owned_wish(state: &AppState, claims: &Claims, id: i64) -> Result<Wish> {
    let wish = state
        .wishes
        .get_wish(id)
        .await?
        .ok_or(MarketError::WishNotFound(id))?;

    if wish.user_id != claims.user_id()? {
        return Err(ApiError::Forbidden("只能修改自己的心愿".to_string()));
    }
    Ok(wish)
}
