//! 玩具申请与其生命周期
//!
//! 状态机：
//!
//! ```text
//! pending ──approve──▶ approved
//!    │
//!    └────reject────▶ rejected
//! ```
//!
//! 只有 pending 可以迁移，终态不可重新打开；只有玩具的物主可以做出决定。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{RequestDecision, RequestStatus};
use crate::error::{MarketError, Result};

impl RequestStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// 按决定迁移状态
    ///
    /// 终态上的任何迁移都会被拒绝。`request_id` 仅用于错误信息。
    pub fn transition(&self, request_id: i64, decision: RequestDecision) -> Result<RequestStatus> {
        let to = decision.target_status();
        match self {
            Self::Pending => Ok(to),
            from => Err(MarketError::InvalidTransition {
                request_id,
                from: *from,
                to,
            }),
        }
    }
}

/// 玩具申请
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ToyRequest {
    pub id: i64,
    pub toy_id: i64,
    /// 申请人
    pub requester_id: i64,
    /// 物主（创建时从玩具复制）
    pub owner_id: i64,
    /// 申请留言
    pub message: String,
    pub status: RequestStatus,
    /// 物主做出决定的时间
    #[sqlx(default)]
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ToyRequest {
    /// 物主对申请做出决定，返回迁移后的状态
    ///
    /// 校验顺序：先校验操作人是物主，再校验状态迁移
    pub fn decide(&self, actor_id: i64, decision: RequestDecision) -> Result<RequestStatus> {
        if actor_id != self.owner_id {
            return Err(MarketError::NotToyOwner {
                toy_id: self.toy_id,
                user_id: actor_id,
            });
        }
        self.status.transition(self.id, decision)
    }
}

/// 新建申请
#[derive(Debug, Clone)]
pub struct NewToyRequest {
    pub toy_id: i64,
    pub requester_id: i64,
    pub owner_id: i64,
    pub message: String,
}

/// 申请列表项（附带玩具标题和双方用户名，供收件箱/发件箱展示）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ToyRequestView {
    pub id: i64,
    pub toy_id: i64,
    pub toy_title: String,
    pub requester_id: i64,
    pub requester_name: String,
    pub owner_id: i64,
    pub owner_name: String,
    pub message: String,
    pub status: RequestStatus,
    #[sqlx(default)]
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ToyRequestView {
    /// 用户是否是该申请的参与方（物主或申请人）
    pub fn involves(&self, user_id: i64) -> bool {
        self.owner_id == user_id || self.requester_id == user_id
    }
}
