//! 数据库仓储层
//!
//! 仓储只负责数据持久化，事务由服务层开启；`*_in_tx` / `*_for_update`
//! 形式的关联函数接收调用方的连接，在同一事务内执行。

mod contact_repo;
mod favorite_repo;
mod message_repo;
mod request_repo;
mod toy_repo;
mod traits;
mod user_repo;
mod wish_repo;

pub use contact_repo::ContactMessageRepository;
pub use favorite_repo::FavoriteRepository;
pub use message_repo::MessageRepository;
pub use request_repo::{RequestQuery, ToyRequestRepository};
pub use toy_repo::ToyRepository;
pub use traits::*;
pub use user_repo::{UserBadgeSnapshot, UserRepository};
pub use wish_repo::WishRepository;
