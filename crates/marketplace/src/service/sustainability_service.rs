//! 可持续积分服务
//!
//! 积分档案、排行榜以及等级表调整后的徽章缓存重算

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::{MarketError, Result};
use crate::repository::{UserRepository, UserRepositoryTrait};
use crate::service::dto::{LeaderboardEntry, SustainabilityProfile};
use crate::sustainability::BadgeTable;

/// 排行榜最大条数
const MAX_LEADERBOARD: i64 = 100;

/// 可持续积分服务
pub struct SustainabilityService<UR = UserRepository>
where
    UR: UserRepositoryTrait,
{
    user_repo: Arc<UR>,
    badges: Arc<BadgeTable>,
}

impl<UR> SustainabilityService<UR>
where
    UR: UserRepositoryTrait,
{
    pub fn new(user_repo: Arc<UR>, badges: Arc<BadgeTable>) -> Self {
        Self { user_repo, badges }
    }

    pub fn badge_table(&self) -> &BadgeTable {
        &self.badges
    }

    /// 用户积分档案，徽章按当前积分实时计算
    pub async fn profile(&self, user_id: i64) -> Result<SustainabilityProfile> {
        let user = self
            .user_repo
            .get_user(user_id)
            .await?
            .ok_or(MarketError::UserNotFound(user_id))?;

        Ok(SustainabilityProfile {
            user_id: user.id,
            progress: self.badges.progress(user.sustainability_score),
            username: user.username,
            toys_shared: user.toys_shared,
            successful_exchanges: user.successful_exchanges,
        })
    }

    /// 积分排行榜，条数限制在 1..=100
    pub async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let limit = limit.clamp(1, MAX_LEADERBOARD);
        let users = self.user_repo.leaderboard(limit).await?;

        Ok(users
            .into_iter()
            .enumerate()
            .map(|(i, user)| {
                let badge = self.badges.badge_for(user.sustainability_score).name.clone();
                LeaderboardEntry::new(i + 1, user, badge)
            })
            .collect())
    }

    /// 按当前等级表重写所有与积分不一致的徽章缓存，返回更新数量
    ///
    /// 快照之后积分又被交换改写的用户不会被覆盖，交换事务已按新积分写好徽章
    #[instrument(skip(self))]
    pub async fn recompute_badges(&self) -> Result<usize> {
        let snapshots = self.user_repo.list_badge_snapshots().await?;
        let total = snapshots.len();
        let mut updated = 0;
        let mut skipped = 0;

        for snapshot in snapshots {
            let badge = &self.badges.badge_for(snapshot.sustainability_score).name;
            if *badge == snapshot.current_badge {
                continue;
            }
            if self
                .user_repo
                .update_badge(snapshot.id, snapshot.sustainability_score, badge)
                .await?
            {
                updated += 1;
            } else {
                skipped += 1;
            }
        }

        info!(total, updated, skipped, "徽章缓存重算完成");
        Ok(updated)
    }
}
