//! Orchestrator monitoring types
//!
//! Servers, rooms, game-state snapshots and aggregate system metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::pagination::Pagination;
use crate::impl_wire_enum_conversions;

/// Lifecycle status of a game server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Offline,
    Starting,
    Stopping,
    Maintenance,
    Error,
    /// Value this client does not know yet
    #[serde(other)]
    Unknown,
}

impl_wire_enum_conversions!(ServerStatus {
    Online => "online",
    Offline => "offline",
    Starting => "starting",
    Stopping => "stopping",
    Maintenance => "maintenance",
    Error => "error",
    Unknown => "unknown",
});

/// Game server registered with the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub status: ServerStatus,
    #[serde(default)]
    pub player_count: u32,
    #[serde(default)]
    pub max_players: u32,
    #[serde(default)]
    pub room_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<DateTime<Utc>>,
}

/// Response of `GET /servers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServersListResponse {
    pub servers: Vec<Server>,
    pub pagination: Pagination,
}

/// Filters for `GET /servers`. Field order is the query-string order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<ServerStatus>,
    pub region: Option<String>,
    pub search: Option<String>,
}

/// State of a room hosted on a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
    /// Value this client does not know yet
    #[serde(other)]
    Unknown,
}

impl_wire_enum_conversions!(RoomStatus {
    Waiting => "waiting",
    Playing => "playing",
    Finished => "finished",
    Unknown => "unknown",
});

/// Game room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub server_id: String,
    pub status: RoomStatus,
    #[serde(default)]
    pub player_count: u32,
    #[serde(default)]
    pub max_players: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsListResponse {
    pub rooms: Vec<Room>,
    pub pagination: Pagination,
}

/// Filters for `GET /rooms`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub server_id: Option<String>,
    pub status: Option<RoomStatus>,
}

/// One player inside a game-state snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub connected: bool,
}

/// Snapshot of a room's game state
///
/// `extra` keeps game-specific fields the dashboard renders verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub room_id: String,
    pub tick: u64,
    pub phase: String,
    #[serde(default)]
    pub players: Vec<PlayerState>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Aggregate metrics from `GET /metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    pub total_servers: u32,
    pub online_servers: u32,
    pub total_rooms: u32,
    pub active_rooms: u32,
    pub total_players: u32,
    #[serde(default)]
    pub average_cpu: f64,
    #[serde(default)]
    pub average_memory: f64,
    pub timestamp: DateTime<Utc>,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorHealth {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl OrchestratorHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_tolerates_missing_optional_fields() {
        let json = r#"{"id":"s1","name":"eu-1","host":"10.0.0.1","port":7777,"status":"online"}"#;
        let server: Server = serde_json::from_str(json).unwrap();
        assert_eq!(server.status, ServerStatus::Online);
        assert_eq!(server.player_count, 0);
        assert!(server.last_heartbeat.is_none());
    }

    #[test]
    fn list_with_new_status_still_decodes() {
        let json = r#"{
            "servers": [
                {"id":"s1","name":"eu-1","host":"10.0.0.1","port":7777,"status":"online"},
                {"id":"s2","name":"eu-2","host":"10.0.0.2","port":7777,"status":"degraded"}
            ],
            "pagination": {"page":1,"limit":20,"total":2,"totalPages":1}
        }"#;
        let list: ServersListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(list.servers.len(), 2);
        assert_eq!(list.servers[0].status, ServerStatus::Online);
        assert_eq!(list.servers[1].status, ServerStatus::Unknown);

        let room: RoomStatus = serde_json::from_str(r#""archived""#).unwrap();
        assert_eq!(room, RoomStatus::Unknown);
    }

    #[test]
    fn game_state_keeps_unknown_fields() {
        let json = r#"{
            "roomId": "r1",
            "tick": 42,
            "phase": "playing",
            "updatedAt": "2024-05-01T12:00:00Z",
            "board": [1, 2, 3]
        }"#;
        let state: GameState = serde_json::from_str(json).unwrap();
        assert_eq!(state.tick, 42);
        assert!(state.players.is_empty());
        assert_eq!(state.extra["board"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn health_status_words() {
        let mut health = OrchestratorHealth {
            status: "OK".into(),
            version: None,
            uptime_seconds: None,
            timestamp: None,
        };
        assert!(health.is_healthy());
        health.status = "degraded".into();
        assert!(!health.is_healthy());
    }
}
