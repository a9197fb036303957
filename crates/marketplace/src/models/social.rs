//! 社区功能实体：收藏、站内信、心愿单、联系留言

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::ContactStatus;

/// 收藏（只表示存在关系，无状态）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub user_id: i64,
    pub toy_id: i64,
    pub created_at: DateTime<Utc>,
}

/// 站内信
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    /// 关联的玩具（可选）
    #[sqlx(default)]
    pub toy_id: Option<i64>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// 新建站内信
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub toy_id: Option<i64>,
    pub content: String,
}

/// 收件箱会话摘要：与某个用户的最新一条消息及未读数
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub partner_id: i64,
    pub partner_name: String,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub unread_count: i64,
}

/// 心愿（"想要" 帖）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(default)]
    pub category: Option<String>,
    #[sqlx(default)]
    pub age_range: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 心愿内容（新建和修改共用）
#[derive(Debug, Clone)]
pub struct WishDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub age_range: Option<String>,
}

/// 联系留言
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新建联系留言
#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
