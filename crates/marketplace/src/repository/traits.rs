//! 仓储 Trait 定义
//!
//! 服务层只依赖这些接口，测试时用 mockall 生成的 mock 替换

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewToy, NewToyRequest, Toy, ToyChanges, ToyRequest, ToyStatus, User};

use super::request_repo::RequestQuery;
use super::user_repo::UserBadgeSnapshot;

/// 用户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn leaderboard(&self, limit: i64) -> Result<Vec<User>>;

    // 徽章缓存
    async fn list_badge_snapshots(&self) -> Result<Vec<UserBadgeSnapshot>>;
    async fn update_badge(&self, user_id: i64, expected_score: i32, badge: &str)
        -> Result<bool>;
}

/// 玩具仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToyRepositoryTrait: Send + Sync {
    async fn get_toy(&self, id: i64) -> Result<Option<Toy>>;
    async fn create_toy(&self, toy: &NewToy) -> Result<Toy>;
    async fn update_toy(&self, id: i64, changes: &ToyChanges) -> Result<Option<Toy>>;
    async fn set_status(&self, id: i64, status: ToyStatus) -> Result<Option<Toy>>;
    async fn delete_toy(&self, id: i64) -> Result<bool>;
}

/// 玩具申请仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToyRequestRepositoryTrait: Send + Sync {
    async fn get_request(&self, id: i64) -> Result<Option<ToyRequest>>;
    async fn has_pending(&self, toy_id: i64, requester_id: i64) -> Result<bool>;
    async fn create_request(&self, request: &NewToyRequest) -> Result<ToyRequest>;
    async fn count(&self, query: &RequestQuery) -> Result<i64>;
}
