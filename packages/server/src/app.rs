//! Composition root.
//!
//! Dependencies are created in order:
//! 1. Repository
//! 2. MessagePusher, MessageStore, ContentFilter
//! 3. UseCases
//! 4. AppState / Server

use std::sync::Arc;

use parlor_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::{
    config::ServerConfig,
    domain::{ContentFilter, Lobby, MessageStore},
    infrastructure::{
        content_filter::WordListFilter,
        message_pusher::WebSocketMessagePusher,
        message_store::{InMemoryMessageStore, JsonLinesMessageStore},
        repository::InMemoryLobbyRepository,
    },
    ui::{AppState, Server},
    usecase::{
        BroadcastPresenceUseCase, CallSignalingUseCase, ConnectClientUseCase,
        DisconnectClientUseCase, GetPresenceUseCase, GetRecentMessagesUseCase,
        MAX_HISTORY_LIMIT, RelayMessageUseCase, SetDisplayNameUseCase,
    },
};

/// Build a server with the default collaborators for `config`.
pub fn build_server(config: &ServerConfig) -> Server {
    let message_store: Arc<dyn MessageStore> = match &config.history_file {
        Some(path) => {
            tracing::info!("Persisting chat history to '{}'", path.display());
            Arc::new(JsonLinesMessageStore::new(path.clone()))
        }
        None => {
            let retention = config.recent_history_len.max(MAX_HISTORY_LIMIT);
            tracing::info!("Keeping the last {} chat messages in memory", retention);
            Arc::new(InMemoryMessageStore::with_retention(retention))
        }
    };
    let content_filter = Arc::new(WordListFilter::with_defaults(&config.blocked_words));
    tracing::info!("Content filter blocks {} words", content_filter.len());

    build_server_with(config, message_store, content_filter, Arc::new(SystemClock))
}

/// Build a server with explicit collaborators.
pub fn build_server_with(
    config: &ServerConfig,
    message_store: Arc<dyn MessageStore>,
    content_filter: Arc<dyn ContentFilter>,
    clock: Arc<dyn Clock>,
) -> Server {
    // 1. Repository（単一ロックで守られた Lobby）
    let lobby = Arc::new(Mutex::new(Lobby::new(config.max_connections_per_address)));
    let repository = Arc::new(InMemoryLobbyRepository::new(lobby));

    // 2. MessagePusher
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. UseCases
    let presence = Arc::new(BroadcastPresenceUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let state = AppState {
        connect_client_usecase: Arc::new(ConnectClientUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        set_display_name_usecase: Arc::new(SetDisplayNameUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            message_store.clone(),
            presence.clone(),
            config.max_display_name_chars,
            config.recent_history_len,
        )),
        relay_message_usecase: Arc::new(RelayMessageUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            message_store.clone(),
            content_filter,
            clock,
            config.max_message_chars,
        )),
        call_signaling_usecase: Arc::new(CallSignalingUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
            repository.clone(),
            message_pusher,
            presence,
        )),
        get_presence_usecase: Arc::new(GetPresenceUseCase::new(repository)),
        get_recent_messages_usecase: Arc::new(GetRecentMessagesUseCase::new(message_store)),
        recent_history_len: config.recent_history_len,
    };

    // 4. Server
    Server::new(state)
}
