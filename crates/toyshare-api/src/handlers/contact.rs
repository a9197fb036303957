//! 联系表单 API 处理器

use axum::{Json, extract::State};
use toyshare_marketplace::{ContactMessage, NewContactMessage};
use tracing::info;
use validator::Validate;

use crate::dto::{ApiResponse, ContactRequest};
use crate::error::Result;
use crate::state::AppState;

/// 提交联系留言（无需登录）
///
/// POST /api/contact-messages
pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<ApiResponse<ContactMessage>>> {
    req.validate()?;

    let message = state
        .contacts
        .create(&NewContactMessage::from(req))
        .await?;
    info!(contact_id = message.id, "收到联系留言");

    Ok(Json(ApiResponse::success_with_message(
        message,
        "留言已收到，我们会尽快回复",
    )))
}
