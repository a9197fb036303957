//! 应用状态定义
//!
//! 包含 Axum 路由共享的连接池、仓储和服务

use std::sync::Arc;

use sqlx::PgPool;
use toyshare_marketplace::{
    BadgeTable, ContactMessageRepository, ExchangeService, FavoriteRepository, ListingService,
    MessageRepository, SustainabilityService, ToyRepository, ToyRequestRepository,
    UserRepository, WishRepository, dto::ExchangeRewards,
};
use toyshare_shared::config::{AppConfig, AuthConfig};

use crate::auth::{JwtConfig, JwtManager};
use crate::error::Result;

/// Axum 应用共享状态
///
/// 所有字段都是廉价克隆（连接池内部计数或 Arc）
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池
    pub pool: PgPool,
    pub jwt_manager: Arc<JwtManager>,
    /// 会话 Cookie 配置
    pub auth: AuthConfig,
    pub badges: Arc<BadgeTable>,
    /// 交换完成时的积分奖励
    pub rewards: ExchangeRewards,

    pub users: Arc<UserRepository>,
    pub toys: Arc<ToyRepository>,
    pub requests: Arc<ToyRequestRepository>,
    pub favorites: Arc<FavoriteRepository>,
    pub messages: Arc<MessageRepository>,
    pub wishes: Arc<WishRepository>,
    pub contacts: Arc<ContactMessageRepository>,

    pub exchange: Arc<ExchangeService>,
    pub listings: Arc<ListingService>,
    pub sustainability: Arc<SustainabilityService>,
}

impl AppState {
    /// 根据配置组装仓储和服务
    ///
    /// 徽章等级表无效时返回错误，服务不应带着错误的等级表启动
    pub fn new(pool: PgPool, config: &AppConfig) -> Result<Self> {
        let badges = Arc::new(BadgeTable::from_config(&config.sustainability)?);
        let rewards = ExchangeRewards::from(&config.sustainability);

        let users = Arc::new(UserRepository::new(pool.clone()));
        let toys = Arc::new(ToyRepository::new(pool.clone()));
        let requests = Arc::new(ToyRequestRepository::new(pool.clone()));

        let exchange = Arc::new(ExchangeService::new(
            toys.clone(),
            requests.clone(),
            pool.clone(),
            badges.clone(),
            rewards,
        ));
        let listings = Arc::new(ListingService::new(toys.clone(), requests.clone()));
        let sustainability = Arc::new(SustainabilityService::new(users.clone(), badges.clone()));

        Ok(Self {
            jwt_manager: Arc::new(JwtManager::new(JwtConfig::from(&config.auth))),
            auth: config.auth.clone(),
            badges,
            rewards,
            users,
            toys,
            requests,
            favorites: Arc::new(FavoriteRepository::new(pool.clone())),
            messages: Arc::new(MessageRepository::new(pool.clone())),
            wishes: Arc::new(WishRepository::new(pool.clone())),
            contacts: Arc::new(ContactMessageRepository::new(pool.clone())),
            exchange,
            listings,
            sustainability,
            pool,
        })
    }
}
