//! Conversion logic between DTOs and domain entities, and encoding of
//! `ServerEvent`s into wire messages.

use parlor_shared::time::{rfc3339_to_timestamp, timestamp_to_rfc3339};

use crate::domain::{
    ChatMessage, ClientId, DisplayName, MessageText, Profile, RejectReason, ServerEvent,
    SignalPayload, StoreError, Timestamp,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Profile> for dto::UserInfo {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.as_str().to_string(),
            username: profile
                .display_name
                .as_ref()
                .map(|name| name.as_str().to_string()),
        }
    }
}

impl From<&ChatMessage> for dto::StoredMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.sender_id.as_str().to_string(),
            username: message.sender_name.as_str().to_string(),
            message: message.text.as_str().to_string(),
            created_at: timestamp_to_rfc3339(message.created_at.value()),
        }
    }
}

impl From<&ChatMessage> for dto::ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            r#type: dto::MessageType::NewMessage,
            message: message.text.as_str().to_string(),
            id: message.sender_id.as_str().to_string(),
            username: message.sender_name.as_str().to_string(),
        }
    }
}

// ========================================
// DTO → Domain Entity
// ========================================

/// Stored records are trusted to have passed validation when they were
/// written, so length limits are not re-applied.
impl TryFrom<dto::StoredMessageDto> for ChatMessage {
    type Error = StoreError;

    fn try_from(record: dto::StoredMessageDto) -> Result<Self, Self::Error> {
        let sender_id =
            ClientId::new(record.id).map_err(|e| StoreError::Malformed(e.to_string()))?;
        let sender_name = DisplayName::new(record.username, usize::MAX)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        let text = MessageText::new(record.message, usize::MAX)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        let created_at = rfc3339_to_timestamp(&record.created_at).ok_or_else(|| {
            StoreError::Malformed(format!("invalid createdAt '{}'", record.created_at))
        })?;
        Ok(ChatMessage::new(
            sender_id,
            sender_name,
            text,
            Timestamp::new(created_at),
        ))
    }
}

// ========================================
// ServerEvent → wire message
// ========================================

/// Encode a `ServerEvent` into the JSON text sent over the WebSocket.
pub fn encode_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    match event {
        ServerEvent::Welcome { id, online_users } => serde_json::to_string(&dto::YourIdMessage {
            r#type: dto::MessageType::YourId,
            message: id.as_str().to_string(),
            online_users: *online_users,
        }),
        ServerEvent::ActiveClients { active, recipient } => {
            let recipient = dto::UserInfo::from(recipient);
            serde_json::to_string(&dto::ActiveClientsMessage {
                r#type: dto::MessageType::ActiveClients,
                message: active.iter().map(dto::UserInfo::from).collect(),
                id: recipient.id,
                username: recipient.username,
            })
        }
        ServerEvent::RecentMessages(messages) => {
            serde_json::to_string(&dto::RecentMessagesMessage {
                r#type: dto::MessageType::RecentMessages,
                message: messages.iter().map(dto::StoredMessageDto::from).collect(),
            })
        }
        ServerEvent::NewMessage(message) => {
            serde_json::to_string(&dto::ChatMessageDto::from(message))
        }
        ServerEvent::SystemNotice(notice) => serde_json::to_string(&dto::ChatMessageDto {
            r#type: dto::MessageType::NewMessage,
            message: notice.clone(),
            id: dto::SYSTEM_SENDER_ID.to_string(),
            username: dto::SYSTEM_SENDER_NAME.to_string(),
        }),
        ServerEvent::CallRequest { caller, target } => {
            serde_json::to_string(&dto::CallRequestMessage {
                r#type: dto::MessageType::CallRequest,
                id: caller.id.as_str().to_string(),
                target: target.as_str().to_string(),
                user: dto::UserInfo::from(caller),
            })
        }
        ServerEvent::CallAccepted { from, target } => serde_json::to_string(&call_event(
            dto::MessageType::CallAccepted,
            from,
            target,
            None,
        )),
        ServerEvent::CallRejected {
            from,
            target,
            reason,
        } => serde_json::to_string(&call_event(
            dto::MessageType::CallRejected,
            from,
            target,
            reason.map(reject_reason),
        )),
        ServerEvent::CallEnded { from, target } => serde_json::to_string(&call_event(
            dto::MessageType::CallEnded,
            from,
            target,
            None,
        )),
        ServerEvent::Signal {
            from,
            target,
            payload,
        } => {
            let (sdp, ice) = match payload {
                SignalPayload::Sdp(sdp) => (Some(sdp.clone()), None),
                SignalPayload::Ice(ice) => (None, Some(ice.clone())),
            };
            serde_json::to_string(&dto::WebRtcSignalMessage {
                r#type: dto::MessageType::WebRtcSignal,
                id: from.as_str().to_string(),
                target: target.as_str().to_string(),
                sdp,
                ice,
            })
        }
    }
}

fn call_event(
    r#type: dto::MessageType,
    from: &Profile,
    target: &ClientId,
    reason: Option<String>,
) -> dto::CallEventMessage {
    dto::CallEventMessage {
        r#type,
        id: from.id.as_str().to_string(),
        target: target.as_str().to_string(),
        username: from
            .display_name
            .as_ref()
            .map(|name| name.as_str().to_string()),
        reason,
    }
}

fn reject_reason(reason: RejectReason) -> String {
    match reason {
        RejectReason::Busy => "busy".to_string(),
    }
}
