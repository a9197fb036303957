//! 请求 DTO 定义
//!
//! 所有 REST API 的请求参数和请求体结构

use serde::Deserialize;
use toyshare_marketplace::{
    ContactStatus, NewContactMessage, ProfileChanges, RequestStatus, ToyChanges, ToyCondition,
    ToyStatus, WishDraft,
};
use validator::{Validate, ValidationError};

/// 用户名只允许字母、数字和下划线
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset")
            .with_message("用户名只能包含字母、数字和下划线".into()))
    }
}

/// 拒绝只包含空白的文本
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("内容不能为空".into()))
    } else {
        Ok(())
    }
}

/// 可选文本去掉首尾空白，空串视为未填写
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================
// 认证与用户
// ============================================

/// 注册请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 30, message = "用户名长度必须在 3-30 之间"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "密码长度必须在 8-128 之间"))]
    pub password: String,
    #[validate(length(max = 50, message = "昵称不能超过 50 个字符"))]
    pub display_name: Option<String>,
    #[validate(length(max = 100, message = "所在地不能超过 100 个字符"))]
    pub location: Option<String>,
}

/// 登录请求，`login` 可以是用户名或邮箱
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    #[validate(length(min = 1, max = 100, message = "用户名长度必须在 1-100 之间"))]
    pub login: String,
    #[validate(length(min = 1, max = 128, message = "密码长度必须在 1-128 之间"))]
    pub password: String,
}

/// 修改个人资料请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 50, message = "昵称不能超过 50 个字符"))]
    pub display_name: Option<String>,
    #[validate(length(max = 100, message = "所在地不能超过 100 个字符"))]
    pub location: Option<String>,
    #[validate(length(max = 500, message = "个人简介不能超过 500 个字符"))]
    pub bio: Option<String>,
    #[validate(url(message = "头像地址必须是有效的 URL"))]
    pub avatar_url: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            display_name: normalize(req.display_name),
            location: normalize(req.location),
            bio: normalize(req.bio),
            avatar_url: normalize(req.avatar_url),
        }
    }
}

/// 排行榜查询
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

// ============================================
// 玩具
// ============================================

/// 发布玩具请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateToyRequest {
    #[validate(
        length(min = 1, max = 100, message = "标题长度必须在 1-100 之间"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    #[validate(length(max = 2000, message = "描述不能超过 2000 个字符"))]
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 50, message = "分类长度必须在 1-50 之间"))]
    pub category: String,
    #[validate(length(min = 1, max = 20, message = "适龄范围长度必须在 1-20 之间"))]
    pub age_range: String,
    #[serde(default)]
    pub condition: ToyCondition,
    #[validate(length(max = 100, message = "所在地不能超过 100 个字符"))]
    pub location: Option<String>,
    #[validate(url(message = "图片地址必须是有效的 URL"))]
    pub image_url: Option<String>,
}

/// 修改玩具请求（未提供的字段保持不变）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateToyRequest {
    #[validate(
        length(min = 1, max = 100, message = "标题长度必须在 1-100 之间"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    #[validate(length(max = 2000, message = "描述不能超过 2000 个字符"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50, message = "分类长度必须在 1-50 之间"))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 20, message = "适龄范围长度必须在 1-20 之间"))]
    pub age_range: Option<String>,
    pub condition: Option<ToyCondition>,
    #[validate(length(max = 100, message = "所在地不能超过 100 个字符"))]
    pub location: Option<String>,
    #[validate(url(message = "图片地址必须是有效的 URL"))]
    pub image_url: Option<String>,
}

impl From<UpdateToyRequest> for ToyChanges {
    fn from(req: UpdateToyRequest) -> Self {
        Self {
            title: req.title.map(|t| t.trim().to_string()),
            description: req.description,
            category: req.category,
            age_range: req.age_range,
            condition: req.condition,
            location: normalize(req.location),
            image_url: normalize(req.image_url),
        }
    }
}

/// 物主切换上架状态
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

/// 玩具浏览/搜索过滤
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyQueryFilter {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub age_range: Option<String>,
    pub condition: Option<ToyCondition>,
    pub location: Option<String>,
    pub owner_id: Option<i64>,
}

/// 管理员审核玩具
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateToyRequest {
    pub status: ToyStatus,
}

/// 按玩具状态过滤
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyStatusFilter {
    pub status: Option<ToyStatus>,
}

// ============================================
// 交换申请
// ============================================

/// 提交交换申请
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExchangeRequest {
    pub toy_id: i64,
    #[validate(length(max = 1000, message = "留言不能超过 1000 个字符"))]
    #[serde(default)]
    pub message: String,
}

/// 按申请状态过滤
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusFilter {
    pub status: Option<RequestStatus>,
}

// ============================================
// 站内信
// ============================================

/// 发送站内信
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub recipient_id: i64,
    pub toy_id: Option<i64>,
    #[validate(
        length(min = 1, max = 2000, message = "消息长度必须在 1-2000 之间"),
        custom(function = "validate_not_blank")
    )]
    pub content: String,
}

/// 站内信查询：带 `with` 时返回与该用户的会话，否则返回收件箱
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    pub with: Option<i64>,
}

// ============================================
// 心愿单
// ============================================

/// 新建/修改心愿
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WishRequest {
    #[validate(
        length(min = 1, max = 100, message = "标题长度必须在 1-100 之间"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    #[validate(length(max = 1000, message = "描述不能超过 1000 个字符"))]
    pub description: Option<String>,
    #[validate(length(max = 50, message = "分类不能超过 50 个字符"))]
    pub category: Option<String>,
    #[validate(length(max = 20, message = "适龄范围不能超过 20 个字符"))]
    pub age_range: Option<String>,
}

impl From<WishRequest> for WishDraft {
    fn from(req: WishRequest) -> Self {
        Self {
            title: req.title.trim().to_string(),
            description: normalize(req.description),
            category: normalize(req.category),
            age_range: normalize(req.age_range),
        }
    }
}

/// 心愿列表过滤
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishQueryFilter {
    pub user_id: Option<i64>,
}

// ============================================
// 联系表单
// ============================================

/// 提交联系留言
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "姓名长度必须在 1-100 之间"))]
    pub name: String,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "主题长度必须在 1-200 之间"))]
    pub subject: String,
    #[validate(
        length(min = 1, max = 5000, message = "留言长度必须在 1-5000 之间"),
        custom(function = "validate_not_blank")
    )]
    pub message: String,
}

impl From<ContactRequest> for NewContactMessage {
    fn from(req: ContactRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            subject: req.subject.trim().to_string(),
            message: req.message.trim().to_string(),
        }
    }
}

/// 管理员修改联系留言状态
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStatusRequest {
    pub status: ContactStatus,
}

/// 按留言状态过滤
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStatusFilter {
    pub status: Option<ContactStatus>,
}

// ============================================
// 分页
// ============================================

/// 分页参数
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    /// 当前页码（最小为 1）
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    /// 计算数据库查询的 offset
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    /// 获取限制条数（1..=100）
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_clamps() {
        let p = PaginationParams {
            page: 3,
            page_size: 500,
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 200);

        let p = PaginationParams {
            page: 0,
            page_size: 0,
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 0);

        let p = PaginationParams::default();
        assert_eq!((p.page, p.page_size), (1, 20));
    }

    #[test]
    fn test_register_validation() {
        let valid = RegisterRequest {
            username: "toy_lover_1".to_string(),
            email: "lily@example.com".to_string(),
            password: "long-enough".to_string(),
            display_name: None,
            location: None,
        };
        assert!(valid.validate().is_ok());

        let bad_name = RegisterRequest {
            username: "lily!".to_string(),
            ..valid_clone(&valid)
        };
        assert!(bad_name.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..valid_clone(&valid)
        };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid_clone(&valid)
        };
        assert!(bad_email.validate().is_err());
    }

    fn valid_clone(req: &RegisterRequest) -> RegisterRequest {
        RegisterRequest {
            username: req.username.clone(),
            email: req.email.clone(),
            password: req.password.clone(),
            display_name: req.display_name.clone(),
            location: req.location.clone(),
        }
    }

    #[test]
    fn test_login_accepts_username_or_email_key() {
        let by_email: LoginRequest =
            serde_json::from_str(r#"{"email":"lily@example.com","password":"x"}"#).unwrap();
        assert_eq!(by_email.login, "lily@example.com");

        let by_username: LoginRequest =
            serde_json::from_str(r#"{"username":"lily","password":"x"}"#).unwrap();
        assert_eq!(by_username.login, "lily");
    }

    #[test]
    fn test_blank_title_rejected() {
        let req: CreateToyRequest = serde_json::from_str(
            r#"{"title":"   ","category":"puzzles","ageRange":"3-5","condition":"like_new"}"#,
        )
        .unwrap();
        assert_eq!(req.condition, ToyCondition::LikeNew);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_wish_draft_normalizes_optional_fields() {
        let draft = WishDraft::from(WishRequest {
            title: "  乐高城堡 ".to_string(),
            description: Some("   ".to_string()),
            category: Some("building".to_string()),
            age_range: None,
        });
        assert_eq!(draft.title, "乐高城堡");
        assert!(draft.description.is_none());
        assert_eq!(draft.category.as_deref(), Some("building"));
    }

    #[test]
    fn test_status_filters_parse_lowercase() {
        let filter: RequestStatusFilter = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(filter.status, Some(RequestStatus::Pending));

        let filter: ToyStatusFilter = serde_json::from_str(r#"{}"#).unwrap();
        assert!(filter.status.is_none());
    }
}
