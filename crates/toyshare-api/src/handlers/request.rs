//! 交换申请 API 处理器
//!
//! 提交申请、收件箱/发件箱，以及物主的同意和拒绝

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use toyshare_marketplace::{
    MarketError, RequestDecision, RequestQuery, ToyRequest, ToyRequestView,
    dto::{CreateToyRequestCommand, DecisionOutcome},
};
use validator::Validate;

use crate::auth::Claims;
use crate::dto::{
    ApiResponse, CreateExchangeRequest, PageResponse, PaginationParams, RequestStatusFilter,
};
use crate::error::Result;
use crate::state::AppState;

/// 提交交换申请
///
/// POST /api/requests
pub async fn create_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateExchangeRequest>,
) -> Result<Json<ApiResponse<ToyRequest>>> {
    req.validate()?;

    let request = state
        .exchange
        .create_request(CreateToyRequestCommand {
            toy_id: req.toy_id,
            requester_id: claims.user_id()?,
            message: req.message,
        })
        .await?;

    Ok(Json(ApiResponse::success(request)))
}

/// 收到的申请（当前用户是物主）
///
/// GET /api/requests/incoming
pub async fn incoming(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<RequestStatusFilter>,
) -> Result<Json<ApiResponse<PageResponse<ToyRequestView>>>> {
    let query = RequestQuery::incoming(claims.user_id()?, filter.status);
    list_page(&state, &query, &pagination).await
}

/// 发出的申请（当前用户是申请人）
///
/// GET /api/requests/outgoing
pub async fn outgoing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<RequestStatusFilter>,
) -> Result<Json<ApiResponse<PageResponse<ToyRequestView>>>> {
    let query = RequestQuery::outgoing(claims.user_id()?, filter.status);
    list_page(&state, &query, &pagination).await
}

pub(crate) async fn list_page(
    state: &AppState,
    query: &RequestQuery,
    pagination: &PaginationParams,
) -> Result<Json<ApiResponse<PageResponse<ToyRequestView>>>> {
    let total = state.requests.count(query).await?;
    if total == 0 {
        return Ok(Json(ApiResponse::success(PageResponse::empty(
            pagination.page(),
            pagination.limit(),
        ))));
    }

    let items = state
        .requests
        .list(query, pagination.limit(), pagination.offset())
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))))
}

/// 申请详情，仅物主、申请人和管理员可见
///
/// GET /api/requests/{id}
pub async fn get_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ToyRequestView>>> {
    let user_id = claims.user_id()?;
    let view = state
        .requests
        .get_view(id)
        .await?
        .ok_or(MarketError::RequestNotFound(id))?;

    if !view.involves(user_id) && !claims.is_admin() {
        return Err(MarketError::Forbidden(format!("无权查看申请 {}", id)).into());
    }

    Ok(Json(ApiResponse::success(view)))
}

/// 物主同意申请
///
/// POST /api/requests/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DecisionOutcome>>> {
    decide(&state, &claims, id, RequestDecision::Approve).await
}

/// 物主拒绝申请
///
/// POST /api/requests/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DecisionOutcome>>> {
    decide(&state, &claims, id, RequestDecision::Reject).await
}

async fn decide(
    state: &AppState,
    claims: &Claims,
    id: i64,
    decision: RequestDecision,
) -> Result<Json<ApiResponse<DecisionOutcome>>> {
    let outcome = state
        .exchange
        .decide_request(id, claims.user_id()?, decision)
        .await?;

    let message = match decision {
        RequestDecision::Approve => "申请已同意，交换完成",
        RequestDecision::Reject => "申请已拒绝",
    };
    Ok(Json(ApiResponse::success_with_message(outcome, message)))
}
