//! Domain layer.
//!
//! The `Lobby` aggregate owns every piece of shared mutable state (who is
//! connected, how many connections each address holds, which calls are in
//! progress). Collaborators the domain needs but does not implement are
//! declared here as traits and provided by the infrastructure layer.

pub mod call;
pub mod content_filter;
pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod lobby;
pub mod message_pusher;
pub mod message_store;
pub mod repository;
pub mod value_object;

pub use call::{CallAction, CallBook, CallOutcome, CallPeer, CallState, CallTransition};
pub use content_filter::ContentFilter;
#[cfg(test)]
pub use content_filter::MockContentFilter;
pub use entity::{ChatMessage, Departure, Identity, Profile};
pub use error::{MessagePushError, RepositoryError, StoreError, ValueObjectError};
pub use event::{RejectReason, ServerEvent, SignalPayload};
pub use factory::ClientIdFactory;
pub use lobby::{DEFAULT_MAX_CONNECTIONS_PER_ADDRESS, Lobby, PresenceSnapshot};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use message_store::MessageStore;
#[cfg(test)]
pub use message_store::MockMessageStore;
pub use repository::LobbyRepository;
pub use value_object::{
    ClientId, DEFAULT_MAX_DISPLAY_NAME_CHARS, DEFAULT_MAX_MESSAGE_CHARS, DisplayName,
    MessageText, SourceAddress, Timestamp,
};
