//! 认证模块
//!
//! 会话令牌（JWT）签发与校验、密码哈希、会话 Cookie

mod jwt;
mod password;
mod session;

pub use jwt::{Claims, JwtConfig, JwtManager};
pub use password::{hash_password, verify_password};
pub use session::{clear_session_cookie, session_cookie, session_token};
