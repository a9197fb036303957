//! 玩具上架信息

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ToyCondition, ToyStatus};

/// 玩具
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Toy {
    pub id: i64,
    /// 发布者
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    /// 分类（如 puzzles、outdoor、plush）
    pub category: String,
    /// 适龄范围（如 "3-5"）
    pub age_range: String,
    pub condition: ToyCondition,
    #[sqlx(default)]
    pub location: Option<String>,
    #[sqlx(default)]
    pub image_url: Option<String>,
    /// 冗余列，等于 status == Active
    pub is_available: bool,
    pub status: ToyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Toy {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    /// 是否可被申请
    ///
    /// 同时检查两列，任何一列显示不可用都视为不可用
    pub fn can_be_requested(&self) -> bool {
        self.is_available && self.status.is_available()
    }
}

/// 新建玩具
#[derive(Debug, Clone)]
pub struct NewToy {
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub age_range: String,
    pub condition: ToyCondition,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// 玩具信息修改（None 表示不修改）
#[derive(Debug, Clone, Default)]
pub struct ToyChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub age_range: Option<String>,
    pub condition: Option<ToyCondition>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// 玩具查询过滤
#[derive(Debug, Clone, Default)]
pub struct ToyFilter {
    /// 标题/描述模糊匹配
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub age_range: Option<String>,
    pub condition: Option<ToyCondition>,
    pub location: Option<String>,
    pub owner_id: Option<i64>,
    /// None 表示不限状态
    pub status: Option<ToyStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy(status: ToyStatus, is_available: bool) -> Toy {
        Toy {
            id: 1,
            owner_id: 7,
            title: "木制火车".to_string(),
            description: "轨道齐全".to_string(),
            category: "vehicles".to_string(),
            age_range: "3-5".to_string(),
            condition: ToyCondition::Good,
            location: None,
            image_url: None,
            is_available,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_be_requested() {
        assert!(toy(ToyStatus::Active, true).can_be_requested());
        assert!(!toy(ToyStatus::Traded, false).can_be_requested());
        assert!(!toy(ToyStatus::Inactive, false).can_be_requested());
        // 历史数据中两列不一致时按不可用处理
        assert!(!toy(ToyStatus::Active, false).can_be_requested());
    }

    #[test]
    fn test_is_owned_by() {
        let t = toy(ToyStatus::Active, true);
        assert!(t.is_owned_by(7));
        assert!(!t.is_owned_by(8));
    }
}
