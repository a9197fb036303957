//! 交换市场错误类型
//!
//! 定义服务层的业务错误和系统错误

use thiserror::Error;

use crate::models::RequestStatus;

/// 交换市场错误类型
#[derive(Debug, Error)]
pub enum MarketError {
    // === 资源不存在 ===
    #[error("用户不存在: {0}")]
    UserNotFound(i64),

    #[error("玩具不存在: {0}")]
    ToyNotFound(i64),

    #[error("玩具申请不存在: {0}")]
    RequestNotFound(i64),

    #[error("消息不存在: {0}")]
    MessageNotFound(i64),

    #[error("心愿不存在: {0}")]
    WishNotFound(i64),

    #[error("联系留言不存在: {0}")]
    ContactMessageNotFound(i64),

    // === 申请生命周期 ===
    #[error("申请状态不允许此操作: request_id={request_id}, {from} -> {to}")]
    InvalidTransition {
        request_id: i64,
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("只有物主可以操作: toy_id={toy_id}, user_id={user_id}")]
    NotToyOwner { toy_id: i64, user_id: i64 },

    #[error("不能申请自己发布的玩具: toy_id={0}")]
    SelfRequest(i64),

    #[error("玩具当前不可交换: toy_id={0}")]
    ToyUnavailable(i64),

    #[error("已存在待处理的申请: toy_id={toy_id}, requester_id={requester_id}")]
    DuplicatePendingRequest { toy_id: i64, requester_id: i64 },

    #[error("玩具仍有待处理的申请，无法删除: toy_id={toy_id}, pending={pending}")]
    ToyHasPendingRequests { toy_id: i64, pending: i64 },

    // === 用户 ===
    #[error("用户名已被占用: {0}")]
    UsernameTaken(String),

    #[error("邮箱已被注册: {0}")]
    EmailTaken(String),

    // === 徽章 ===
    #[error("徽章等级表无效: {0}")]
    InvalidBadgeTable(String),

    // === 通用 ===
    #[error("无权访问: {0}")]
    Forbidden(String),

    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
}

/// 交换市场 Result 类型别名
pub type Result<T> = std::result::Result<T, MarketError>;

impl MarketError {
    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(self, Self::Database(_))
    }

    /// 获取错误码（用于 API 响应和指标标签）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::ToyNotFound(_) => "TOY_NOT_FOUND",
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::MessageNotFound(_) => "MESSAGE_NOT_FOUND",
            Self::WishNotFound(_) => "WISH_NOT_FOUND",
            Self::ContactMessageNotFound(_) => "CONTACT_MESSAGE_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotToyOwner { .. } => "NOT_TOY_OWNER",
            Self::SelfRequest(_) => "SELF_REQUEST",
            Self::ToyUnavailable(_) => "TOY_UNAVAILABLE",
            Self::DuplicatePendingRequest { .. } => "DUPLICATE_PENDING_REQUEST",
            Self::ToyHasPendingRequests { .. } => "TOY_HAS_PENDING_REQUESTS",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::EmailTaken(_) => "EMAIL_TAKEN",
            Self::InvalidBadgeTable(_) => "INVALID_BADGE_TABLE",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// 判断数据库错误是否为唯一约束冲突
///
/// 用于把并发写入时被唯一索引拦下的请求转换成业务错误
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint().is_some_and(|c| c == constraint)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_business_error() {
        assert!(MarketError::ToyNotFound(1).is_business_error());
        assert!(MarketError::SelfRequest(1).is_business_error());
        assert!(!MarketError::Database(sqlx::Error::PoolTimedOut).is_business_error());
    }

    #[test]
    fn test_error_code() {
        assert_eq!(MarketError::ToyNotFound(1).error_code(), "TOY_NOT_FOUND");
        assert_eq!(
            MarketError::InvalidTransition {
                request_id: 1,
                from: RequestStatus::Approved,
                to: RequestStatus::Rejected,
            }
            .error_code(),
            "INVALID_TRANSITION"
        );
    }

    #[test]
    fn test_error_display() {
        let err = MarketError::InvalidTransition {
            request_id: 42,
            from: RequestStatus::Rejected,
            to: RequestStatus::Approved,
        };
        let text = err.to_string();
        assert!(text.contains("42"));
        assert!(text.contains("rejected -> approved"));

        let err = MarketError::DuplicatePendingRequest {
            toy_id: 7,
            requester_id: 9,
        };
        assert!(err.to_string().contains("toy_id=7"));
    }

    #[test]
    fn test_unique_violation_ignores_other_errors() {
        assert!(!is_unique_violation(
            &sqlx::Error::RowNotFound,
            "uq_toy_requests_pending"
        ));
    }
}
