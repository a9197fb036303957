//! HTTP 层错误类型定义
//!
//! 统一把领域错误、认证错误映射为 HTTP 状态码和 JSON 错误信封

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use toyshare_marketplace::MarketError;

/// API 错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("禁止访问: {0}")]
    Forbidden(String),
    #[error("用户名或密码错误")]
    InvalidCredentials,

    #[error("参数验证失败: {0}")]
    Validation(String),

    // 领域错误，状态码按具体变体决定
    #[error(transparent)]
    Market(#[from] MarketError),

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Market(e) => market_status(e),
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Market(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

fn market_status(err: &MarketError) -> StatusCode {
    match err {
        MarketError::UserNotFound(_)
        | MarketError::ToyNotFound(_)
        | MarketError::RequestNotFound(_)
        | MarketError::MessageNotFound(_)
        | MarketError::WishNotFound(_)
        | MarketError::ContactMessageNotFound(_) => StatusCode::NOT_FOUND,

        MarketError::Validation(_)
        | MarketError::SelfRequest(_)
        | MarketError::InvalidBadgeTable(_) => StatusCode::BAD_REQUEST,

        MarketError::NotToyOwner { .. } | MarketError::Forbidden(_) => StatusCode::FORBIDDEN,

        MarketError::InvalidTransition { .. }
        | MarketError::ToyUnavailable(_)
        | MarketError::DuplicatePendingRequest { .. }
        | MarketError::ToyHasPendingRequests { .. }
        | MarketError::UsernameTaken(_)
        | MarketError::EmailTaken(_) => StatusCode::CONFLICT,

        MarketError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Database(e) | Self::Market(MarketError::Database(e)) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// API 层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use toyshare_marketplace::RequestStatus;

    fn all_error_variants() -> Vec<(ApiError, StatusCode, &'static str)> {
        vec![
            (ApiError::Unauthorized("token expired".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (ApiError::Forbidden("admin only".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            (ApiError::Validation("title is required".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (MarketError::ToyNotFound(1).into(), StatusCode::NOT_FOUND, "TOY_NOT_FOUND"),
            (MarketError::RequestNotFound(2).into(), StatusCode::NOT_FOUND, "REQUEST_NOT_FOUND"),
            (MarketError::UserNotFound(3).into(), StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            (MarketError::SelfRequest(4).into(), StatusCode::BAD_REQUEST, "SELF_REQUEST"),
            (MarketError::Validation("bad".into()).into(), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (
                MarketError::NotToyOwner { toy_id: 1, user_id: 2 }.into(),
                StatusCode::FORBIDDEN,
                "NOT_TOY_OWNER",
            ),
            (
                MarketError::InvalidTransition {
                    request_id: 1,
                    from: RequestStatus::Approved,
                    to: RequestStatus::Rejected,
                }
                .into(),
                StatusCode::CONFLICT,
                "INVALID_TRANSITION",
            ),
            (MarketError::ToyUnavailable(5).into(), StatusCode::CONFLICT, "TOY_UNAVAILABLE"),
            (
                MarketError::DuplicatePendingRequest { toy_id: 1, requester_id: 2 }.into(),
                StatusCode::CONFLICT,
                "DUPLICATE_PENDING_REQUEST",
            ),
            (
                MarketError::ToyHasPendingRequests { toy_id: 1, pending: 2 }.into(),
                StatusCode::CONFLICT,
                "TOY_HAS_PENDING_REQUESTS",
            ),
            (MarketError::UsernameTaken("lily".into()).into(), StatusCode::CONFLICT, "USERNAME_TAKEN"),
            (MarketError::EmailTaken("a@b.c".into()).into(), StatusCode::CONFLICT, "EMAIL_TAKEN"),
            (ApiError::Internal("unexpected state".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ]
    }

    #[test]
    fn test_status_and_code_mapping() {
        for (err, status, code) in all_error_variants() {
            assert_eq!(err.status_code(), status, "status mismatch for {err:?}");
            assert_eq!(err.error_code(), code, "code mismatch for {err:?}");
        }
    }

    #[test]
    fn test_into_response_status() {
        for (err, status, _) in all_error_variants() {
            let response = err.into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn test_database_error_is_masked() {
        let err = ApiError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "DATABASE_ERROR");

        let err: ApiError = MarketError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_market_message_passes_through() {
        let err: ApiError = MarketError::ToyUnavailable(9).into();
        assert!(err.to_string().contains("toy_id=9"));
    }
}
