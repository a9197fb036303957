//! 站内信 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use toyshare_marketplace::{MarketError, Message, NewMessage};
use tracing::debug;
use validator::Validate;

use crate::auth::Claims;
use crate::dto::{
    ApiResponse, MessageListing, MessageQuery, PageResponse, PaginationParams,
    SendMessageRequest, UnreadCount,
};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 收件箱，或带 `?with=userId` 时返回与该用户的会话
///
/// 打开会话会把对方发来的未读消息标为已读
///
/// GET /api/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<ApiResponse<MessageListing>>> {
    let user_id = claims.user_id()?;

    let Some(partner_id) = query.with else {
        let inbox = state.messages.inbox(user_id).await?;
        return Ok(Json(ApiResponse::success(MessageListing::Inbox(inbox))));
    };

    let total = state.messages.count_conversation(user_id, partner_id).await?;
    let items = state
        .messages
        .conversation(user_id, partner_id, pagination.limit(), pagination.offset())
        .await?;

    let marked = state
        .messages
        .mark_conversation_read(user_id, partner_id)
        .await?;
    debug!(user_id, partner_id, marked, "会话消息已标为已读");

    Ok(Json(ApiResponse::success(MessageListing::Conversation(
        PageResponse::new(items, total, pagination.page(), pagination.limit()),
    ))))
}

/// 发送站内信
///
/// POST /api/messages
pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<Message>>> {
    req.validate()?;

    let sender_id = claims.user_id()?;
    if req.recipient_id == sender_id {
        return Err(ApiError::Validation("不能给自己发送消息".to_string()));
    }
    if state.users.get_user(req.recipient_id).await?.is_none() {
        return Err(MarketError::UserNotFound(req.recipient_id).into());
    }
    if let Some(toy_id) = req.toy_id {
        if state.toys.get_toy(toy_id).await?.is_none() {
            return Err(MarketError::ToyNotFound(toy_id).into());
        }
    }

    let message = state
        .messages
        .send(&NewMessage {
            sender_id,
            recipient_id: req.recipient_id,
            toy_id: req.toy_id,
            content: req.content.trim().to_string(),
        })
        .await?;

    Ok(Json(ApiResponse::success(message)))
}

/// 未读消息数（前端轮询）
///
/// GET /api/messages/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<UnreadCount>>> {
    let unread = state.messages.unread_count(claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(UnreadCount { unread })))
}

/// 标记单条消息已读，只有收件人可以操作
///
/// PATCH /api/messages/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let message = state
        .messages
        .get_message(id)
        .await?
        .ok_or(MarketError::MessageNotFound(id))?;

    if message.recipient_id != claims.user_id()? {
        return Err(ApiError::Forbidden("只有收件人可以标记已读".to_string()));
    }

    if !message.is_read {
        state.messages.mark_read(id).await?;
    }

    Ok(Json(ApiResponse::<()>::success_empty()))
}
