//! ToyShare 交换市场核心
//!
//! 家庭之间发布、浏览、申请和交换二手玩具的领域层。
//!
//! ## 核心功能
//!
//! - **徽章进度**：根据可持续积分计算当前徽章和升级进度（纯函数）
//! - **申请生命周期**：玩具申请的 pending → approved / rejected 状态机，只有物主能审批
//! - **原子交换**：审批通过时在同一事务内下架玩具、拒绝其余申请并发放积分
//! - **社区功能**：收藏、站内信、心愿单、联系表单
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `sustainability`: 徽章等级表与进度计算
//! - `repository`: 数据库仓储层
//! - `service`: 业务服务层

pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod sustainability;

pub use error::{MarketError, Result};
pub use models::*;
pub use repository::{
    ContactMessageRepository, FavoriteRepository, MessageRepository, RequestQuery, ToyRepository,
    ToyRequestRepository, UserRepository, WishRepository,
};
pub use service::{ExchangeService, ListingService, SustainabilityService, dto};
pub use sustainability::{BadgeProgress, BadgeTable, BadgeTier, ScoreChange};
