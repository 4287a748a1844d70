//! Domain entities

use super::{
    call::CallPeer,
    value_object::{ClientId, DisplayName, MessageText, SourceAddress, Timestamp},
};

/// One connected client, owned by the `Lobby` for the life of its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: ClientId,
    pub display_name: Option<DisplayName>,
    pub address: SourceAddress,
    pub connected_at: Timestamp,
    /// Registration order, used to keep presence lists stable
    pub(crate) sequence: u64,
}

impl Identity {
    pub fn new(
        id: ClientId,
        address: SourceAddress,
        connected_at: Timestamp,
        sequence: u64,
    ) -> Self {
        Self {
            id,
            display_name: None,
            address,
            connected_at,
            sequence,
        }
    }

    /// Unnamed identities are connected but not part of presence.
    pub fn is_named(&self) -> bool {
        self.display_name.is_some()
    }

    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// The public face of an identity: what other clients are allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: ClientId,
    pub display_name: Option<DisplayName>,
}

/// A chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender_id: ClientId,
    pub sender_name: DisplayName,
    pub text: MessageText,
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(
        sender_id: ClientId,
        sender_name: DisplayName,
        text: MessageText,
        created_at: Timestamp,
    ) -> Self {
        Self {
            sender_id,
            sender_name,
            text,
            created_at,
        }
    }
}

/// What remains of an identity after it was unregistered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub identity: Identity,
    /// Peer of the call the identity was part of, if any
    pub call_peer: Option<CallPeer>,
}
