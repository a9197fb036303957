//! 服务层
//!
//! - `exchange_service`: 申请创建与审批（原子交换）
//! - `listing_service`: 物主管理自己发布的玩具
//! - `sustainability_service`: 积分档案、排行榜、徽章重算

pub mod dto;
pub mod exchange_service;
pub mod listing_service;
pub mod sustainability_service;

pub use exchange_service::ExchangeService;
pub use listing_service::ListingService;
pub use sustainability_service::SustainabilityService;
