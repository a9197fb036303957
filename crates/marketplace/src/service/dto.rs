//! 服务层数据传输对象

use serde::{Deserialize, Serialize};

use toyshare_shared::config::SustainabilityConfig;

use crate::models::{ToyRequest, User};
use crate::sustainability::{BadgeProgress, ScoreChange};

/// 创建申请命令
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateToyRequestCommand {
    pub toy_id: i64,
    pub requester_id: i64,
    #[serde(default)]
    pub message: String,
}

/// 交换完成时发放的积分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRewards {
    pub owner_points: i32,
    pub requester_points: i32,
}

impl From<&SustainabilityConfig> for ExchangeRewards {
    fn from(config: &SustainabilityConfig) -> Self {
        Self {
            owner_points: config.owner_points,
            requester_points: config.requester_points,
        }
    }
}

impl Default for ExchangeRewards {
    fn default() -> Self {
        Self {
            owner_points: 10,
            requester_points: 5,
        }
    }
}

/// 审批结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutcome {
    pub request: ToyRequest,
    /// 同一玩具被自动拒绝的其他申请数
    pub auto_rejected: u64,
    /// 物主积分变化（仅同意时）
    pub owner_change: Option<ScoreChange>,
    /// 申请人积分变化（仅同意时）
    pub requester_change: Option<ScoreChange>,
}

impl DecisionOutcome {
    pub fn rejected(request: ToyRequest) -> Self {
        Self {
            request,
            auto_rejected: 0,
            owner_change: None,
            requester_change: None,
        }
    }
}

/// 用户可持续积分档案
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityProfile {
    pub user_id: i64,
    pub username: String,
    pub toys_shared: i32,
    pub successful_exchanges: i32,
    pub progress: BadgeProgress,
}

/// 排行榜条目
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub sustainability_score: i32,
    pub badge: String,
    pub toys_shared: i32,
}

impl LeaderboardEntry {
    pub fn new(rank: usize, user: User, badge: String) -> Self {
        Self {
            rank,
            user_id: user.id,
            username: user.username,
            display_name: user.display_name,
            sustainability_score: user.sustainability_score,
            badge,
            toys_shared: user.toys_shared,
        }
    }
}
