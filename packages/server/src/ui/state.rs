//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    CallSignalingUseCase, ConnectClientUseCase, DisconnectClientUseCase, GetPresenceUseCase,
    GetRecentMessagesUseCase, RelayMessageUseCase, SetDisplayNameUseCase,
};

/// Use cases reachable from the handlers
pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub set_display_name_usecase: Arc<SetDisplayNameUseCase>,
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    pub call_signaling_usecase: Arc<CallSignalingUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub get_presence_usecase: Arc<GetPresenceUseCase>,
    pub get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
    /// Default `limit` of `GET /api/messages`
    pub recent_history_len: usize,
}
