//! 领域模型

pub mod enums;
pub mod request;
pub mod social;
pub mod toy;
pub mod user;

pub use enums::*;
pub use request::*;
pub use social::*;
pub use toy::*;
pub use user::*;
