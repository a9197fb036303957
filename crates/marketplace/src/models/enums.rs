//! 交换市场枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx，小写 varchar）和 JSON（serde，小写）序列化

use std::fmt;

use serde::{Deserialize, Serialize};

/// 用户角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum UserRole {
    /// 普通家庭用户
    #[default]
    User,
    /// 管理员 - 可访问审核后台
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// 玩具上架状态
///
/// `is_available` 列始终等于 `status == Active`，两者只能通过状态一起写入
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ToyStatus {
    /// 在架 - 可被申请
    #[default]
    Active,
    /// 已交换 - 申请审批通过后由生命周期写入
    Traded,
    /// 已下架 - 物主或管理员暂停
    Inactive,
}

impl ToyStatus {
    /// 该状态下玩具是否可被申请
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Traded => "traded",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ToyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 玩具成色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum ToyCondition {
    New,
    LikeNew,
    #[default]
    Good,
    Fair,
}

/// 申请状态
///
/// pending 为初始态，approved / rejected 为终态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum RequestStatus {
    /// 待物主处理
    #[default]
    Pending,
    /// 物主已同意
    Approved,
    /// 物主已拒绝
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 物主对申请的决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDecision {
    Approve,
    Reject,
}

impl RequestDecision {
    /// 该决定对应的目标状态
    pub fn target_status(&self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// 联系留言处理状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ContactStatus {
    /// 新留言
    #[default]
    New,
    /// 已读
    Read,
    /// 已处理
    Resolved,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [Self::New, Self::Read, Self::Resolved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Resolved => "resolved",
        }
    }
}
