//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::{StoredMessageDto, UserInfo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// `GET /api/presence`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceResponse {
    #[serde(rename = "onlineUsers")]
    pub online_users: usize,
    #[serde(rename = "activeClients")]
    pub active_clients: Vec<UserInfo>,
}

/// Query of `GET /api/messages`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<usize>,
}

/// `GET /api/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<StoredMessageDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
