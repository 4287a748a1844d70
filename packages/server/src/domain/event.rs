//! Events the server pushes to clients.
//!
//! Use cases produce `ServerEvent`s; turning them into wire messages is the
//! job of the infrastructure layer.

use serde_json::Value;

use super::{
    entity::{ChatMessage, Profile},
    value_object::ClientId,
};

/// Opaque WebRTC signaling payload. Never inspected by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalPayload {
    Sdp(Value),
    Ice(Value),
}

impl SignalPayload {
    /// Build a payload from the two optional wire fields.
    ///
    /// Exactly one of `sdp` and `ice` must be present (JSON `null` counts as absent).
    pub fn from_parts(sdp: Option<Value>, ice: Option<Value>) -> Option<Self> {
        let present = |value: Option<Value>| value.filter(|v| !v.is_null());
        match (present(sdp), present(ice)) {
            (Some(sdp), None) => Some(Self::Sdp(sdp)),
            (None, Some(ice)) => Some(Self::Ice(ice)),
            _ => None,
        }
    }
}

/// Why a call request was turned down by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Busy,
}

/// Event pushed to a single client
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Sent once, right after a connection is admitted
    Welcome { id: ClientId, online_users: usize },
    /// Full presence snapshot, with the recipient's own profile echoed back
    ActiveClients {
        active: Vec<Profile>,
        recipient: Profile,
    },
    /// History replayed after a client names itself, oldest first
    RecentMessages(Vec<ChatMessage>),
    NewMessage(ChatMessage),
    /// Rejection notice shown to the sender only
    SystemNotice(String),
    CallRequest {
        caller: Profile,
        target: ClientId,
    },
    CallAccepted {
        from: Profile,
        target: ClientId,
    },
    CallRejected {
        from: Profile,
        target: ClientId,
        reason: Option<RejectReason>,
    },
    CallEnded {
        from: Profile,
        target: ClientId,
    },
    Signal {
        from: ClientId,
        target: ClientId,
        payload: SignalPayload,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signal_payload_requires_exactly_one_part() {
        // テスト項目: sdp と ice のどちらか一方だけが指定された場合のみ有効
        // given (前提条件):
        let sdp = json!({"type": "offer", "sdp": "v=0"});
        let ice = json!({"candidate": "candidate:1 1 UDP 1 10.0.0.1 9 typ host"});

        // when (操作):
        let only_sdp = SignalPayload::from_parts(Some(sdp.clone()), None);
        let only_ice = SignalPayload::from_parts(None, Some(ice.clone()));
        let both = SignalPayload::from_parts(Some(sdp.clone()), Some(ice.clone()));
        let neither = SignalPayload::from_parts(None, None);
        let null_sdp = SignalPayload::from_parts(Some(Value::Null), Some(ice.clone()));

        // then (期待する結果):
        assert_eq!(only_sdp, Some(SignalPayload::Sdp(sdp)));
        assert_eq!(only_ice, Some(SignalPayload::Ice(ice.clone())));
        assert_eq!(both, None);
        assert_eq!(neither, None);
        assert_eq!(null_sdp, Some(SignalPayload::Ice(ice)));
    }
}
