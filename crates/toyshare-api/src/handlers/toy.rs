//! 玩具 API 处理器
//!
//! 浏览、搜索和物主对自己玩具的管理

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use toyshare_marketplace::{MarketError, NewToy, Toy, ToyFilter, ToyStatus};
use validator::Validate;

use crate::auth::Claims;
use crate::dto::{
    ApiResponse, AvailabilityRequest, CreateToyRequest, DeletedResponse, PageResponse,
    PaginationParams, ToyQueryFilter, UpdateToyRequest,
};
use crate::error::Result;
use crate::state::AppState;

/// 下架的玩具只对物主和管理员可见
pub(crate) fn visible_to(toy: &Toy, claims: Option<&Claims>) -> bool {
    if toy.status != ToyStatus::Inactive {
        return true;
    }
    claims.is_some_and(|c| c.is_admin() || c.user_id().is_ok_and(|id| toy.is_owned_by(id)))
}

/// 浏览/搜索玩具
///
/// GET /api/toys
///
/// 默认只返回在架玩具；`ownerId` 是当前用户时返回其全部玩具
pub async fn list_toys(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ToyQueryFilter>,
) -> Result<Json<ApiResponse<PageResponse<Toy>>>> {
    let caller = claims.and_then(|Extension(c)| c.user_id().ok());
    let own_listing = query.owner_id.is_some() && query.owner_id == caller;

    let filter = ToyFilter {
        keyword: query.keyword.filter(|k| !k.trim().is_empty()),
        category: query.category,
        age_range: query.age_range,
        condition: query.condition,
        location: query.location.filter(|l| !l.trim().is_empty()),
        owner_id: query.owner_id,
        status: if own_listing {
            None
        } else {
            Some(ToyStatus::Active)
        },
    };

    search(&state, &filter, &pagination).await
}

/// 当前用户发布的全部玩具
///
/// GET /api/toys/mine
pub async fn my_toys(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Toy>>>> {
    let filter = ToyFilter {
        owner_id: Some(claims.user_id()?),
        ..Default::default()
    };
    search(&state, &filter, &pagination).await
}

pub(crate) async fn search(
    state: &AppState,
    filter: &ToyFilter,
    pagination: &PaginationParams,
) -> Result<Json<ApiResponse<PageResponse<Toy>>>> {
    let total = state.toys.count(filter).await?;
    if total == 0 {
        return Ok(Json(ApiResponse::success(PageResponse::empty(
            pagination.page(),
            pagination.limit(),
        ))));
    }

    let items = state
        .toys
        .search(filter, pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))))
}

/// 玩具详情
///
/// GET /api/toys/{id}
pub async fn get_toy(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Toy>>> {
    let toy = state
        .toys
        .get_toy(id)
        .await?
        .filter(|t| visible_to(t, claims.as_ref().map(|Extension(c)| c)))
        .ok_or(MarketError::ToyNotFound(id))?;

    Ok(Json(ApiResponse::success(toy)))
}

/// 发布玩具
///
/// POST /api/toys
pub async fn create_toy(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateToyRequest>,
) -> Result<Json<ApiResponse<Toy>>> {
    req.validate()?;

    let toy = state
        .listings
        .create_toy(NewToy {
            owner_id: claims.user_id()?,
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            category: req.category.trim().to_string(),
            age_range: req.age_range.trim().to_string(),
            condition: req.condition,
            location: req.location.filter(|l| !l.trim().is_empty()),
            image_url: req.image_url.filter(|u| !u.trim().is_empty()),
        })
        .await?;

    Ok(Json(ApiResponse::success(toy)))
}

/// 物主编辑玩具
///
/// PUT /api/toys/{id}
pub async fn update_toy(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateToyRequest>,
) -> Result<Json<ApiResponse<Toy>>> {
    req.validate()?;

    let toy = state
        .listings
        .update_toy(id, claims.user_id()?, req.into())
        .await?;

    Ok(Json(ApiResponse::success(toy)))
}

/// 物主上下架
///
/// PATCH /api/toys/{id}/availability
pub async fn set_availability(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(req): Json<AvailabilityRequest>,
) -> Result<Json<ApiResponse<Toy>>> {
    let toy = state
        .listings
        .set_availability(id, claims.user_id()?, req.is_available)
        .await?;

    Ok(Json(ApiResponse::success(toy)))
}

/// 物主删除玩具
///
/// DELETE /api/toys/{id}
pub async fn delete_toy(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedResponse>>> {
    state.listings.delete_toy(id, claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(DeletedResponse::success())))
}
