//! 可持续积分与徽章
//!
//! 徽章完全由积分推导：给定一张按门槛升序的等级表，积分落在哪一档就是哪个徽章。
//! 计算本身是纯函数，不读写数据库。

mod progression;

pub use progression::{BadgeProgress, BadgeTable, BadgeTier, ScoreChange};
