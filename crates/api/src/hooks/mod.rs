//! Façade-bound fetch handles for dashboard views
//!
//! Each constructor binds one service call to the generic fetch machinery in
//! `opsdeck-core`, unwrapping the [`ApiResponse`](opsdeck_infra::ApiResponse)
//! envelope so views observe the payload directly.

use std::time::Duration;

use opsdeck_core::{FetchHandle, FetchOptions, PageRequest, PaginatedFetch, Poller};
use opsdeck_domain::{
    GameState, OrchestratorHealth, RoomFilters, RoomsListResponse, ServerFilters,
    ServersListResponse, SystemMetrics, User, UserFilters, UserStats, UsersListResponse,
};
use opsdeck_infra::ApiError;

use crate::context::AppContext;

fn initial_page(page: Option<u32>, limit: Option<u32>) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest { page: page.unwrap_or(defaults.page), limit: limit.unwrap_or(defaults.limit) }
}

/// Paginated user list. `filters.page`/`filters.limit` seed the cursor; the
/// cursor owns them afterwards.
pub fn paginated_users(
    ctx: &AppContext,
    filters: UserFilters,
    options: FetchOptions<UsersListResponse, ApiError>,
) -> PaginatedFetch<UsersListResponse, ApiError> {
    let users = ctx.users.clone();
    let initial = initial_page(filters.page, filters.limit);

    PaginatedFetch::new(
        initial,
        move |request: PageRequest| {
            let users = users.clone();
            let filters =
                UserFilters { page: Some(request.page), limit: Some(request.limit), ..filters.clone() };
            async move { users.list_users(&filters).await.map(|r| r.into_data()) }
        },
        options,
    )
}

pub fn paginated_servers(
    ctx: &AppContext,
    filters: ServerFilters,
    options: FetchOptions<ServersListResponse, ApiError>,
) -> PaginatedFetch<ServersListResponse, ApiError> {
    let orchestrator = ctx.orchestrator.clone();
    let initial = initial_page(filters.page, filters.limit);

    PaginatedFetch::new(
        initial,
        move |request: PageRequest| {
            let orchestrator = orchestrator.clone();
            let filters = ServerFilters {
                page: Some(request.page),
                limit: Some(request.limit),
                ..filters.clone()
            };
            async move { orchestrator.get_servers(&filters).await.map(|r| r.into_data()) }
        },
        options,
    )
}

pub fn paginated_rooms(
    ctx: &AppContext,
    filters: RoomFilters,
    options: FetchOptions<RoomsListResponse, ApiError>,
) -> PaginatedFetch<RoomsListResponse, ApiError> {
    let orchestrator = ctx.orchestrator.clone();
    let initial = initial_page(filters.page, filters.limit);

    PaginatedFetch::new(
        initial,
        move |request: PageRequest| {
            let orchestrator = orchestrator.clone();
            let filters =
                RoomFilters { page: Some(request.page), limit: Some(request.limit), ..filters.clone() };
            async move { orchestrator.get_rooms(&filters).await.map(|r| r.into_data()) }
        },
        options,
    )
}

pub fn user(
    ctx: &AppContext,
    id: impl Into<String>,
    options: FetchOptions<User, ApiError>,
) -> FetchHandle<User, ApiError> {
    let users = ctx.users.clone();
    let id = id.into();
    FetchHandle::new(
        move || {
            let users = users.clone();
            let id = id.clone();
            async move { users.get_user(&id).await.map(|r| r.into_data()) }
        },
        options,
    )
}

pub fn user_stats(
    ctx: &AppContext,
    options: FetchOptions<UserStats, ApiError>,
) -> FetchHandle<UserStats, ApiError> {
    let users = ctx.users.clone();
    FetchHandle::new(
        move || {
            let users = users.clone();
            async move { users.get_user_stats().await.map(|r| r.into_data()) }
        },
        options,
    )
}

pub fn orchestrator_health(
    ctx: &AppContext,
    options: FetchOptions<OrchestratorHealth, ApiError>,
) -> FetchHandle<OrchestratorHealth, ApiError> {
    let orchestrator = ctx.orchestrator.clone();
    FetchHandle::new(
        move || {
            let orchestrator = orchestrator.clone();
            async move { orchestrator.health().await.map(|r| r.into_data()) }
        },
        options,
    )
}

pub fn system_metrics(
    ctx: &AppContext,
    options: FetchOptions<SystemMetrics, ApiError>,
) -> FetchHandle<SystemMetrics, ApiError> {
    let orchestrator = ctx.orchestrator.clone();
    FetchHandle::new(
        move || {
            let orchestrator = orchestrator.clone();
            async move { orchestrator.get_metrics().await.map(|r| r.into_data()) }
        },
        options,
    )
}

pub fn game_state(
    ctx: &AppContext,
    room_id: impl Into<String>,
    options: FetchOptions<GameState, ApiError>,
) -> FetchHandle<GameState, ApiError> {
    let orchestrator = ctx.orchestrator.clone();
    let room_id = room_id.into();
    FetchHandle::new(
        move || {
            let orchestrator = orchestrator.clone();
            let room_id = room_id.clone();
            async move { orchestrator.get_game_state(&room_id).await.map(|r| r.into_data()) }
        },
        options,
    )
}

/// Metrics handle plus the poller refreshing it. Dropping the poller stops
/// the refresh; the handle keeps its last state.
pub fn poll_metrics(
    ctx: &AppContext,
    interval: Duration,
    options: FetchOptions<SystemMetrics, ApiError>,
) -> (FetchHandle<SystemMetrics, ApiError>, Poller) {
    let handle = system_metrics(ctx, options);
    let poller = Poller::start(handle.clone(), interval);
    (handle, poller)
}

/// Live game-state view of one room.
pub fn poll_game_state(
    ctx: &AppContext,
    room_id: impl Into<String>,
    interval: Duration,
    options: FetchOptions<GameState, ApiError>,
) -> (FetchHandle<GameState, ApiError>, Poller) {
    let handle = game_state(ctx, room_id, options);
    let poller = Poller::start(handle.clone(), interval);
    (handle, poller)
}
