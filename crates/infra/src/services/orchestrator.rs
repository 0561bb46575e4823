//! Orchestrator monitoring façade
//!
//! Read-mostly view of game servers, rooms and aggregate metrics. Responses
//! are returned as the server sent them.

use std::sync::Arc;

use opsdeck_core::ToQuery;
use opsdeck_domain::{
    GameState, OrchestratorHealth, Room, RoomFilters, RoomsListResponse, Server, ServerFilters,
    ServersListResponse, SystemMetrics,
};
use serde_json::Value;
use tracing::instrument;

use crate::api::{ApiClient, ApiError, ApiRequest, ApiResponse};

pub struct OrchestratorService {
    client: Arc<ApiClient>,
}

impl OrchestratorService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<ApiResponse<OrchestratorHealth>, ApiError> {
        self.client.get("/health").await
    }

    #[instrument(skip(self))]
    pub async fn get_servers(
        &self,
        filters: &ServerFilters,
    ) -> Result<ApiResponse<ServersListResponse>, ApiError> {
        self.client.get(&filters.to_query().append_to("/servers")).await
    }

    #[instrument(skip(self))]
    pub async fn get_server(&self, id: &str) -> Result<ApiResponse<Server>, ApiError> {
        self.client.get(&resource_path("servers", id)?).await
    }

    #[instrument(skip(self))]
    pub async fn restart_server(&self, id: &str) -> Result<ApiResponse<Value>, ApiError> {
        let path = format!("{}/restart", resource_path("servers", id)?);
        self.client.request(ApiRequest::post(path)).await
    }

    #[instrument(skip(self))]
    pub async fn get_rooms(
        &self,
        filters: &RoomFilters,
    ) -> Result<ApiResponse<RoomsListResponse>, ApiError> {
        self.client.get(&filters.to_query().append_to("/rooms")).await
    }

    #[instrument(skip(self))]
    pub async fn get_room(&self, id: &str) -> Result<ApiResponse<Room>, ApiError> {
        self.client.get(&resource_path("rooms", id)?).await
    }

    /// Current game state of a room.
    #[instrument(skip(self))]
    pub async fn get_game_state(&self, room_id: &str) -> Result<ApiResponse<GameState>, ApiError> {
        let path = format!("{}/state", resource_path("rooms", room_id)?);
        self.client.get(&path).await
    }

    #[instrument(skip(self))]
    pub async fn get_metrics(&self) -> Result<ApiResponse<SystemMetrics>, ApiError> {
        self.client.get("/metrics").await
    }
}

fn resource_path(collection: &str, id: &str) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{collection} id must not be empty")));
    }
    Ok(format!("/{collection}/{}", urlencoding::encode(id)))
}
