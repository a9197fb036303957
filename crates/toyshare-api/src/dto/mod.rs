//! 数据传输对象
//!
//! 包含所有请求和响应的结构体

pub mod request;
pub mod response;

pub use request::{
    AvailabilityRequest, ContactRequest, ContactStatusFilter, ContactStatusRequest,
    CreateExchangeRequest, CreateToyRequest, LeaderboardQuery, LoginRequest, MessageQuery,
    ModerateToyRequest, PaginationParams, RegisterRequest, RequestStatusFilter,
    SendMessageRequest, ToyQueryFilter, ToyStatusFilter, UpdateProfileRequest, UpdateToyRequest,
    WishQueryFilter, WishRequest,
};

pub use response::{
    ApiResponse, BadgeTableResponse, CurrentUserResponse, DeletedResponse, FavoriteStatus,
    MessageListing, PageResponse, RecomputeResult, SessionResponse, StatsOverview, UnreadCount,
};
