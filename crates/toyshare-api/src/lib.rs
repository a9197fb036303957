//! ToyShare REST API 服务
//!
//! 家庭之间交换二手玩具的 HTTP 接口层。
//!
//! ## 核心功能
//!
//! - **认证**：注册、登录（用户名或邮箱），会话令牌写入 HttpOnly Cookie
//! - **玩具**：浏览搜索、发布编辑、上下架
//! - **交换申请**：提交申请，物主同意或拒绝；同意时在一个事务内完成交换和积分发放
//! - **社区**：收藏、站内信、心愿单、联系表单
//! - **管理后台**：统计、玩具审核、联系留言处理、徽章重算
//!
//! ## 模块结构
//!
//! - `app`: Router 组装与中间件栈
//! - `auth`: JWT、密码哈希与会话 Cookie
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: HTTP 错误映射
//! - `handlers`: HTTP 请求处理器
//! - `middleware`: 会话认证与管理员守卫
//! - `routes`: 路由配置
//! - `state`: 应用状态

pub mod app;
pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::build_router;
pub use dto::{ApiResponse, PageResponse, PaginationParams};
pub use error::{ApiError, Result};
pub use state::AppState;
