//! 徽章等级表与升级进度计算

use serde::{Deserialize, Serialize};

use toyshare_shared::config::SustainabilityConfig;

use crate::error::{MarketError, Result};

/// 徽章等级
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeTier {
    pub name: String,
    /// 达到该等级所需的最低积分（含）
    pub min_score: i32,
}

impl BadgeTier {
    pub fn new(name: impl Into<String>, min_score: i32) -> Self {
        Self {
            name: name.into(),
            min_score,
        }
    }
}

/// 某个积分对应的徽章进度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProgress {
    pub score: i32,
    pub current: BadgeTier,
    /// 下一等级，最高等级时为 None
    pub next: Option<BadgeTier>,
    /// 升级进度百分比，范围 [0, 100]
    pub progress_percent: f64,
    /// 距下一等级还差的积分
    pub points_to_next: Option<i32>,
    pub is_top_tier: bool,
}

/// 一次加分的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChange {
    pub previous_score: i32,
    pub new_score: i32,
    pub previous_badge: String,
    pub new_badge: String,
    /// 是否升到了更高等级
    pub promoted: bool,
}

/// 徽章等级表
///
/// 构造时校验，之后不可变：至少一档、门槛非负且按升序排列（允许相等）、名称非空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeTable {
    tiers: Vec<BadgeTier>,
}

impl BadgeTable {
    pub fn new(tiers: Vec<BadgeTier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(MarketError::InvalidBadgeTable(
                "至少需要一个等级".to_string(),
            ));
        }

        for (i, tier) in tiers.iter().enumerate() {
            if tier.name.trim().is_empty() {
                return Err(MarketError::InvalidBadgeTable(format!(
                    "第 {} 个等级名称为空",
                    i + 1
                )));
            }
            if tier.min_score < 0 {
                return Err(MarketError::InvalidBadgeTable(format!(
                    "等级 {} 的门槛不能为负: {}",
                    tier.name, tier.min_score
                )));
            }
        }

        if let Some(pair) = tiers.windows(2).find(|w| w[1].min_score < w[0].min_score) {
            return Err(MarketError::InvalidBadgeTable(format!(
                "等级必须按门槛升序排列: {}({}) 在 {}({}) 之后",
                pair[1].name, pair[1].min_score, pair[0].name, pair[0].min_score
            )));
        }

        Ok(Self { tiers })
    }

    /// 从配置构建
    pub fn from_config(config: &SustainabilityConfig) -> Result<Self> {
        Self::new(
            config
                .tiers
                .iter()
                .map(|t| BadgeTier::new(t.name.clone(), t.min_score))
                .collect(),
        )
    }

    pub fn tiers(&self) -> &[BadgeTier] {
        &self.tiers
    }

    /// 积分所在等级的下标
    ///
    /// 取门槛不超过积分的最高一档；门槛相同时后一档优先；低于所有门槛时取第一档
    fn tier_index(&self, score: i32) -> usize {
        self.tiers
            .iter()
            .rposition(|t| t.min_score <= score)
            .unwrap_or(0)
    }

    /// 积分对应的徽章
    pub fn badge_for(&self, score: i32) -> &BadgeTier {
        &self.tiers[self.tier_index(score)]
    }

    /// 下一等级，已是最高等级时返回 None
    pub fn next_tier(&self, score: i32) -> Option<&BadgeTier> {
        self.tiers.get(self.tier_index(score) + 1)
    }

    /// 向下一等级的进度百分比
    pub fn progress_to_next(&self, score: i32) -> f64 {
        let current = self.badge_for(score);
        let Some(next) = self.next_tier(score) else {
            return 100.0;
        };

        let span = i64::from(next.min_score) - i64::from(current.min_score);
        if span <= 0 {
            return 100.0;
        }

        let gained = i64::from(score) - i64::from(current.min_score);
        (gained as f64 * 100.0 / span as f64).clamp(0.0, 100.0)
    }

    /// 完整的进度信息
    pub fn progress(&self, score: i32) -> BadgeProgress {
        let current = self.badge_for(score).clone();
        let next = self.next_tier(score).cloned();
        let points_to_next = next
            .as_ref()
            .map(|n| n.min_score.saturating_sub(score).max(0));

        BadgeProgress {
            score,
            progress_percent: self.progress_to_next(score),
            is_top_tier: next.is_none(),
            current,
            next,
            points_to_next,
        }
    }

    /// 加分并计算徽章变化
    ///
    /// 积分只增不减，负的加分会被拒绝；溢出时饱和到 i32::MAX
    pub fn apply_points(&self, score: i32, points: i32) -> Result<ScoreChange> {
        if points < 0 {
            return Err(MarketError::Validation(format!(
                "积分奖励不能为负: {points}"
            )));
        }

        let new_score = score.saturating_add(points);
        let before = self.tier_index(score);
        let after = self.tier_index(new_score);

        Ok(ScoreChange {
            previous_score: score,
            new_score,
            previous_badge: self.tiers[before].name.clone(),
            new_badge: self.tiers[after].name.clone(),
            promoted: after > before,
        })
    }
}

impl Default for BadgeTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                BadgeTier::new("Newcomer", 0),
                BadgeTier::new("EcoFriend", 10),
                BadgeTier::new("SustainabilityHero", 25),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BadgeTable {
        BadgeTable::default()
    }

    #[test]
    fn test_reference_scores() {
        let table = table();

        assert_eq!(table.badge_for(7).name, "Newcomer");
        assert_eq!(table.progress_to_next(7), 70.0);

        assert_eq!(table.badge_for(10).name, "EcoFriend");
        assert_eq!(table.progress_to_next(10), 0.0);

        assert_eq!(table.badge_for(30).name, "SustainabilityHero");
        assert_eq!(table.progress_to_next(30), 100.0);
    }

    #[test]
    fn test_badge_is_highest_reached_tier() {
        let table = table();
        for score in 0..=60 {
            let badge = table.badge_for(score);
            assert!(badge.min_score <= score, "score={score}");
            // 不存在介于徽章门槛和积分之间的更高等级
            assert!(
                !table
                    .tiers()
                    .iter()
                    .any(|t| t.min_score > badge.min_score && t.min_score <= score),
                "score={score}"
            );
        }
    }

    #[test]
    fn test_progress_non_decreasing_within_band() {
        let table = table();
        let mut previous: Option<(String, f64)> = None;
        for score in 0..=60 {
            let badge = table.badge_for(score).name.clone();
            let progress = table.progress_to_next(score);
            assert!((0.0..=100.0).contains(&progress));
            if let Some((prev_badge, prev_progress)) = &previous
                && *prev_badge == badge
            {
                assert!(progress >= *prev_progress, "score={score}");
            }
            previous = Some((badge, progress));
        }
    }

    #[test]
    fn test_top_tier_is_explicit() {
        let table = table();
        for score in [25, 26, 100, i32::MAX] {
            let progress = table.progress(score);
            assert!(progress.is_top_tier);
            assert!(progress.next.is_none());
            assert!(progress.points_to_next.is_none());
            assert_eq!(progress.progress_percent, 100.0);
        }

        let progress = table.progress(7);
        assert!(!progress.is_top_tier);
        assert_eq!(progress.next.map(|t| t.name), Some("EcoFriend".to_string()));
        assert_eq!(progress.points_to_next, Some(3));
    }

    #[test]
    fn test_score_below_first_tier() {
        let table = BadgeTable::new(vec![
            BadgeTier::new("Seedling", 5),
            BadgeTier::new("Sprout", 15),
        ])
        .unwrap();

        assert_eq!(table.badge_for(0).name, "Seedling");
        assert_eq!(table.progress_to_next(0), 0.0);
        assert_eq!(table.badge_for(-3).name, "Seedling");
    }

    #[test]
    fn test_degenerate_table() {
        let table = BadgeTable::new(vec![
            BadgeTier::new("A", 0),
            BadgeTier::new("B", 10),
            BadgeTier::new("C", 10),
        ])
        .unwrap();

        // 门槛相同时后一档优先
        assert_eq!(table.badge_for(10).name, "C");
        assert_eq!(table.next_tier(5).map(|t| t.name.as_str()), Some("B"));

        let single = BadgeTable::new(vec![BadgeTier::new("Only", 0)]).unwrap();
        assert_eq!(single.progress_to_next(0), 100.0);
    }

    #[test]
    fn test_invalid_tables_rejected() {
        assert!(BadgeTable::new(vec![]).is_err());
        assert!(BadgeTable::new(vec![BadgeTier::new("  ", 0)]).is_err());
        assert!(BadgeTable::new(vec![BadgeTier::new("Neg", -1)]).is_err());

        let err = BadgeTable::new(vec![BadgeTier::new("B", 10), BadgeTier::new("A", 0)])
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidBadgeTable(_)));
    }

    #[test]
    fn test_from_config_default_matches_default_table() {
        let table = BadgeTable::from_config(&SustainabilityConfig::default()).unwrap();
        assert_eq!(table, BadgeTable::default());
    }

    #[test]
    fn test_apply_points() {
        let table = table();

        let change = table.apply_points(7, 5).unwrap();
        assert_eq!(change.new_score, 12);
        assert_eq!(change.previous_badge, "Newcomer");
        assert_eq!(change.new_badge, "EcoFriend");
        assert!(change.promoted);

        let change = table.apply_points(12, 5).unwrap();
        assert!(!change.promoted);
        assert_eq!(change.new_badge, "EcoFriend");

        let change = table.apply_points(i32::MAX - 1, 10).unwrap();
        assert_eq!(change.new_score, i32::MAX);

        assert!(table.apply_points(10, -1).is_err());
    }
}
