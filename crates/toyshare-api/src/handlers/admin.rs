//! 管理后台 API 处理器
//!
//! 统计、用户与玩具审核、申请查看、联系留言处理和徽章重算。
//! 路由层已通过 `require_admin` 校验管理员角色。

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use toyshare_marketplace::{
    ContactMessage, ContactStatus, MarketError, RequestQuery, Toy, ToyFilter, ToyRequestView,
    User,
};
use tracing::info;

use crate::auth::Claims;
use crate::dto::{
    ApiResponse, ContactStatusFilter, ContactStatusRequest, ModerateToyRequest, PageResponse,
    PaginationParams, RecomputeResult, RequestStatusFilter, StatsOverview, ToyStatusFilter,
};
use crate::error::Result;
use crate::handlers::{request, toy};
use crate::state::AppState;

/// 统计总览
///
/// GET /api/admin/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<ApiResponse<StatsOverview>>> {
    let mut overview = StatsOverview {
        total_users: state.users.count_users().await?,
        ..Default::default()
    };

    for (status, count) in state.toys.count_by_status().await? {
        overview.toys.insert(status.as_str().to_string(), count);
    }
    for (status, count) in state.requests.count_by_status().await? {
        overview.requests.insert(status.as_str().to_string(), count);
    }
    for status in ContactStatus::ALL {
        let count = state.contacts.count(Some(status)).await?;
        overview
            .contact_messages
            .insert(status.as_str().to_string(), count);
    }

    Ok(Json(ApiResponse::success(overview)))
}

/// 用户列表
///
/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<User>>>> {
    let total = state.users.count_users().await?;
    let items = state
        .users
        .list_users(pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))))
}

/// 玩具列表（任意状态）
///
/// GET /api/admin/toys
pub async fn list_toys(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<ToyStatusFilter>,
) -> Result<Json<ApiResponse<PageResponse<Toy>>>> {
    let filter = ToyFilter {
        status: filter.status,
        ..Default::default()
    };
    toy::search(&state, &filter, &pagination).await
}

/// 审核玩具状态
///
/// PATCH /api/admin/toys/{id}/status
pub async fn moderate_toy(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(req): Json<ModerateToyRequest>,
) -> Result<Json<ApiResponse<Toy>>> {
    let toy = state.listings.moderate(id, req.status).await?;
    info!(admin = %claims.username, toy_id = id, status = %req.status, "玩具审核");

    Ok(Json(ApiResponse::success(toy)))
}

/// 全部交换申请
///
/// GET /api/admin/requests
pub async fn list_requests(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<RequestStatusFilter>,
) -> Result<Json<ApiResponse<PageResponse<ToyRequestView>>>> {
    let query = RequestQuery {
        status: filter.status,
        ..Default::default()
    };
    request::list_page(&state, &query, &pagination).await
}

/// 联系留言列表
///
/// GET /api/admin/contact-messages
pub async fn list_contact_messages(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<ContactStatusFilter>,
) -> Result<Json<ApiResponse<PageResponse<ContactMessage>>>> {
    let total = state.contacts.count(filter.status).await?;
    let items = state
        .contacts
        .list(filter.status, pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))))
}

/// 修改联系留言状态
///
/// PATCH /api/admin/contact-messages/{id}/status
pub async fn update_contact_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ContactStatusRequest>,
) -> Result<Json<ApiResponse<ContactMessage>>> {
    let message = state
        .contacts
        .update_status(id, req.status)
        .await?
        .ok_or(MarketError::ContactMessageNotFound(id))?;

    Ok(Json(ApiResponse::success(message)))
}

/// 按当前等级表重算所有用户的徽章缓存
///
/// POST /api/admin/badges/recompute
pub async fn recompute_badges(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<RecomputeResult>>> {
    let updated = state.sustainability.recompute_badges().await?;
    info!(admin = %claims.username, updated, "管理员触发徽章重算");

    Ok(Json(ApiResponse::success(RecomputeResult { updated })))
}
