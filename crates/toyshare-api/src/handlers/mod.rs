//! HTTP 请求处理器模块

pub mod admin;
pub mod auth;
pub mod badge;
pub mod contact;
pub mod favorite;
pub mod message;
pub mod request;
pub mod toy;
pub mod user;
pub mod wish;
