//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射。是否需要登录由 `auth_middleware`
//! 按公开路由表判断，管理后台额外挂载 `require_admin`。

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

use crate::{handlers, middleware::require_admin, state::AppState};

/// 认证路由
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// 用户资料与积分路由
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", put(handlers::user::update_me))
        .route("/users/leaderboard", get(handlers::user::leaderboard))
        .route("/users/{id}", get(handlers::user::get_profile))
        .route(
            "/users/{id}/sustainability",
            get(handlers::user::sustainability),
        )
        .route("/badges", get(handlers::badge::list_tiers))
}

/// 玩具路由
fn toy_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/toys",
            get(handlers::toy::list_toys).post(handlers::toy::create_toy),
        )
        .route("/toys/mine", get(handlers::toy::my_toys))
        .route(
            "/toys/{id}",
            get(handlers::toy::get_toy)
                .put(handlers::toy::update_toy)
                .delete(handlers::toy::delete_toy),
        )
        .route(
            "/toys/{id}/availability",
            patch(handlers::toy::set_availability),
        )
}

/// 交换申请路由
fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/requests", post(handlers::request::create_request))
        .route("/requests/incoming", get(handlers::request::incoming))
        .route("/requests/outgoing", get(handlers::request::outgoing))
        .route("/requests/{id}", get(handlers::request::get_request))
        .route("/requests/{id}/approve", post(handlers::request::approve))
        .route("/requests/{id}/reject", post(handlers::request::reject))
}

/// 收藏、站内信、心愿单和联系表单
fn community_routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(handlers::favorite::list_favorites))
        .route(
            "/favorites/{toy_id}",
            post(handlers::favorite::add_favorite).delete(handlers::favorite::remove_favorite),
        )
        .route(
            "/messages",
            get(handlers::message::list_messages).post(handlers::message::send_message),
        )
        .route(
            "/messages/unread-count",
            get(handlers::message::unread_count),
        )
        .route("/messages/{id}/read", patch(handlers::message::mark_read))
        .route(
            "/wishes",
            get(handlers::wish::list_wishes).post(handlers::wish::create_wish),
        )
        .route(
            "/wishes/{id}",
            put(handlers::wish::update_wish).delete(handlers::wish::delete_wish),
        )
        .route("/contact-messages", post(handlers::contact::submit))
}

/// 管理后台路由，仅管理员可访问
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::admin::stats))
        .route("/users", get(handlers::admin::list_users))
        .route("/toys", get(handlers::admin::list_toys))
        .route("/toys/{id}/status", patch(handlers::admin::moderate_toy))
        .route("/requests", get(handlers::admin::list_requests))
        .route(
            "/contact-messages",
            get(handlers::admin::list_contact_messages),
        )
        .route(
            "/contact-messages/{id}/status",
            patch(handlers::admin::update_contact_status),
        )
        .route(
            "/badges/recompute",
            post(handlers::admin::recompute_badges),
        )
        .route_layer(middleware::from_fn(require_admin))
}

/// 构建完整的 `/api` 路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(toy_routes())
        .merge(request_routes())
        .merge(community_routes())
        .nest("/admin", admin_routes())
}
