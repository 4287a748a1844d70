//! UseCase layer
//!
//! Each use case implements one operation of the relay on top of the domain
//! traits. They are wired together in `crate::app` and driven by the UI layer.

mod broadcast_presence;
mod call_signaling;
mod connect_client;
mod disconnect_client;
mod error;
mod get_presence;
mod get_recent_messages;
mod relay_message;
mod set_display_name;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcast_presence::BroadcastPresenceUseCase;
pub use call_signaling::{CallCommand, CallSignalingUseCase};
pub use connect_client::{ConnectClientUseCase, Connected};
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{ConnectError, RelayError, SetDisplayNameError};
pub use get_presence::{GetPresenceUseCase, PresenceView};
pub use get_recent_messages::{GetRecentMessagesUseCase, MAX_HISTORY_LIMIT};
pub use relay_message::RelayMessageUseCase;
pub use set_display_name::SetDisplayNameUseCase;
