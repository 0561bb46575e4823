//! Domain types and models
//!
//! Wire DTOs for the three REST backends. JSON field names are camelCase on
//! the wire and snake_case in Rust.

pub mod auth;
pub mod orchestrator;
pub mod pagination;
pub mod user;

pub use auth::{
    AuthTokens, ChangePasswordRequest, LoginRequest, LoginResponse, QuickLoginRequest,
    RefreshTokenRequest, TokenValidation,
};
pub use orchestrator::{
    GameState, OrchestratorHealth, PlayerState, Room, RoomFilters, RoomStatus, RoomsListResponse,
    Server, ServerFilters, ServerStatus, ServersListResponse, SystemMetrics,
};
pub use pagination::Pagination;
pub use user::{
    CreateUserRequest, UpdateUserRequest, UpdateUserStatusRequest, User, UserFilters, UserRole,
    UserStats, UserStatus, UsersListResponse,
};
