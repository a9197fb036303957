//! 响应 DTO 定义
//!
//! 所有 REST API 的响应体结构

use std::collections::BTreeMap;

use serde::Serialize;
use toyshare_marketplace::{BadgeProgress, BadgeTier, ConversationSummary, Message, User};

/// 分页响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> PageResponse<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };

        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }

    pub fn empty(page: i64, page_size: i64) -> Self {
        Self::new(Vec::new(), 0, page, page_size)
    }
}

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }

    /// 成功响应（无数据）
    pub fn success_empty() -> ApiResponse<()> {
        ApiResponse {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 登录/注册成功后的会话信息
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// 同时写入 HttpOnly Cookie；非浏览器客户端可作为 Bearer 使用
    pub token: String,
    pub expires_at: i64,
    pub user: User,
}

/// 当前用户及其徽章进度
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub user: User,
    pub progress: BadgeProgress,
}

/// 徽章等级表
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeTableResponse {
    pub tiers: Vec<BadgeTier>,
    /// 交换完成时物主获得的积分
    pub owner_points: i32,
    /// 交换完成时申请人获得的积分
    pub requester_points: i32,
}

/// 收藏状态
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub toy_id: i64,
    pub favorited: bool,
}

/// 站内信列表：收件箱或单个会话
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageListing {
    Inbox(Vec<ConversationSummary>),
    Conversation(PageResponse<Message>),
}

/// 未读消息数
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread: i64,
}

/// 删除成功响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted: bool,
}

impl DeletedResponse {
    pub fn success() -> Self {
        Self { deleted: true }
    }
}

/// 后台统计总览
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total_users: i64,
    /// 按状态统计（键为小写状态名）
    pub toys: BTreeMap<String, i64>,
    pub requests: BTreeMap<String, i64>,
    pub contact_messages: BTreeMap<String, i64>,
}

/// 徽章重算结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeResult {
    /// 徽章发生变化的用户数
    pub updated: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_response_total_pages() {
        let page = PageResponse::new(vec![1, 2, 3], 41, 1, 20);
        assert_eq!(page.total_pages, 3);

        let page = PageResponse::new(vec![1], 40, 2, 20);
        assert_eq!(page.total_pages, 2);

        let page: PageResponse<i32> = PageResponse::empty(1, 20);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_api_response_envelope() {
        let json = serde_json::to_value(ApiResponse::success(DeletedResponse::success())).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["code"], "SUCCESS");
        assert_eq!(json["data"]["deleted"], true);

        let json = serde_json::to_value(ApiResponse::<()>::success_empty()).unwrap();
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_page_response_camel_case() {
        let json = serde_json::to_value(PageResponse::new(vec!["a"], 1, 1, 20)).unwrap();
        assert_eq!(json["pageSize"], 20);
        assert_eq!(json["totalPages"], 1);
    }

    #[test]
    fn test_message_listing_is_untagged() {
        let json = serde_json::to_value(MessageListing::Inbox(Vec::new())).unwrap();
        assert!(json.is_array());

        let json =
            serde_json::to_value(MessageListing::Conversation(PageResponse::empty(1, 20))).unwrap();
        assert_eq!(json["total"], 0);
    }
}
