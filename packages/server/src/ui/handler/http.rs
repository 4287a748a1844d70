//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::{
        http::{ErrorResponse, HealthResponse, MessagesQuery, MessagesResponse, PresenceResponse},
        websocket::{StoredMessageDto, UserInfo},
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Online count and named clients
pub async fn get_presence(State(state): State<Arc<AppState>>) -> Json<PresenceResponse> {
    let view = state.get_presence_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(PresenceResponse {
        online_users: view.online_users,
        active_clients: view.active.iter().map(UserInfo::from).collect(),
    })
}

/// Recent chat history, oldest first
pub async fn get_recent_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagesResponse>, (StatusCode, Json<ErrorResponse>)> {
    let limit = query.limit.unwrap_or(state.recent_history_len);
    match state.get_recent_messages_usecase.execute(limit).await {
        Ok(messages) => Ok(Json(MessagesResponse {
            messages: messages.iter().map(StoredMessageDto::from).collect(),
        })),
        Err(e) => {
            tracing::warn!("Failed to load recent messages: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to load messages".to_string(),
                }),
            ))
        }
    }
}
