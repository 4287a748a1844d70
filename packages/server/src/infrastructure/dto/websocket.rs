//! WebSocket message DTOs.
//!
//! Every message is a JSON object carrying a `type` discriminator. Field names
//! follow the browser client (`message`, `onlineUsers`, `clientId`, ...).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sender id used for notices emitted by the server itself
pub const SYSTEM_SENDER_ID: &str = "admin";
/// Sender name used for notices emitted by the server itself
pub const SYSTEM_SENDER_NAME: &str = "Admin";

// ========================================
// Client → Server
// ========================================

/// Inbound message, dispatched by its `type` tag.
///
/// Sender fields (`id`, `username`, `user`) sent by clients are accepted but
/// ignored: the server stamps them from the registry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "addUsername")]
    AddUsername {
        message: String,
        #[serde(rename = "clientId", default)]
        client_id: Option<String>,
    },
    #[serde(rename = "newMessage")]
    NewMessage { message: String },
    #[serde(rename = "call-request")]
    CallRequest { target: String },
    #[serde(rename = "call-accepted")]
    CallAccepted { target: String },
    #[serde(rename = "call-rejected")]
    CallRejected { target: String },
    #[serde(rename = "call-ended")]
    CallEnded { target: String },
    #[serde(rename = "webrtc-signal")]
    WebRtcSignal {
        target: String,
        #[serde(default)]
        sdp: Option<Value>,
        #[serde(default)]
        ice: Option<Value>,
    },
    /// Any other `type` value
    #[serde(other)]
    Unknown,
}

// ========================================
// Server → Client
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "yourId")]
    YourId,
    #[serde(rename = "activeClients")]
    ActiveClients,
    #[serde(rename = "recentMessages")]
    RecentMessages,
    #[serde(rename = "newMessage")]
    NewMessage,
    #[serde(rename = "call-request")]
    CallRequest,
    #[serde(rename = "call-accepted")]
    CallAccepted,
    #[serde(rename = "call-rejected")]
    CallRejected,
    #[serde(rename = "call-ended")]
    CallEnded,
    #[serde(rename = "webrtc-signal")]
    WebRtcSignal,
}

/// `{id, username}` pair as shown in presence lists and call requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: Option<String>,
}

/// Welcome message, always the first message on a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YourIdMessage {
    pub r#type: MessageType,
    /// Assigned client id
    pub message: String,
    #[serde(rename = "onlineUsers")]
    pub online_users: usize,
}

/// Presence snapshot. `id`/`username` echo the recipient's own identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveClientsMessage {
    pub r#type: MessageType,
    pub message: Vec<UserInfo>,
    pub id: String,
    pub username: Option<String>,
}

/// One stored chat message (also the on-disk record of the JSON-lines store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessageDto {
    /// Sender id
    pub id: String,
    pub username: String,
    pub message: String,
    /// RFC 3339, UTC
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentMessagesMessage {
    pub r#type: MessageType,
    pub message: Vec<StoredMessageDto>,
}

/// Relayed chat line, or a notice from the system sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub r#type: MessageType,
    pub message: String,
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequestMessage {
    pub r#type: MessageType,
    /// Caller id
    pub id: String,
    pub target: String,
    pub user: UserInfo,
}

/// `call-accepted`, `call-rejected` and `call-ended`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEventMessage {
    pub r#type: MessageType,
    pub id: String,
    pub target: String,
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebRtcSignalMessage {
    pub r#type: MessageType,
    pub id: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ice: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_add_username() {
        // テスト項目: addUsername は clientId の有無にかかわらず解析できる
        // given (前提条件):
        let with_id = r#"{"type":"addUsername","message":"alice","clientId":"1a2b3c4d"}"#;
        let without_id = r#"{"type":"addUsername","message":"alice"}"#;

        // when (操作):
        let with_id: ClientMessage = serde_json::from_str(with_id).unwrap();
        let without_id: ClientMessage = serde_json::from_str(without_id).unwrap();

        // then (期待する結果):
        assert_eq!(
            with_id,
            ClientMessage::AddUsername {
                message: "alice".to_string(),
                client_id: Some("1a2b3c4d".to_string()),
            }
        );
        assert_eq!(
            without_id,
            ClientMessage::AddUsername {
                message: "alice".to_string(),
                client_id: None,
            }
        );
    }

    #[test]
    fn test_parse_new_message_ignores_sender_fields() {
        // テスト項目: newMessage の id/username は無視される
        // given (前提条件):
        let raw = r#"{"type":"newMessage","message":"hi","id":"spoofed","username":"mallory"}"#;

        // when (操作):
        let parsed: ClientMessage = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            parsed,
            ClientMessage::NewMessage {
                message: "hi".to_string()
            }
        );
    }

    #[test]
    fn test_parse_call_request_from_browser_client() {
        // テスト項目: ブラウザクライアントが送る call-request を解析できる
        // given (前提条件):
        let raw = json!({
            "type": "call-request",
            "id": "aaaa1111",
            "target": "bbbb2222",
            "user": {"id": "aaaa1111", "username": "alice"}
        })
        .to_string();

        // when (操作):
        let parsed: ClientMessage = serde_json::from_str(&raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            parsed,
            ClientMessage::CallRequest {
                target: "bbbb2222".to_string()
            }
        );
    }

    #[test]
    fn test_parse_webrtc_signal() {
        // テスト項目: webrtc-signal の sdp / ice はそのまま保持される
        // given (前提条件):
        let sdp = json!({"type": "offer", "sdp": "v=0\r\n"});
        let raw = json!({"type": "webrtc-signal", "id": "x", "target": "bbbb2222", "sdp": sdp})
            .to_string();

        // when (操作):
        let parsed: ClientMessage = serde_json::from_str(&raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            parsed,
            ClientMessage::WebRtcSignal {
                target: "bbbb2222".to_string(),
                sdp: Some(sdp),
                ice: None,
            }
        );
    }

    #[test]
    fn test_parse_unknown_type() {
        // テスト項目: 未知の type は Unknown として解析される
        // given (前提条件):
        let raw = r#"{"type":"dance","message":"?"}"#;

        // when (操作):
        let parsed: ClientMessage = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(parsed, ClientMessage::Unknown);
    }

    #[test]
    fn test_parse_malformed_messages_fail() {
        // テスト項目: type がない・必須フィールドがない・JSON でないメッセージはエラーになる
        // given (前提条件):
        let inputs = [
            r#"{"message":"hi"}"#,
            r#"{"type":"newMessage"}"#,
            r#"{"type":"call-request"}"#,
            "not json",
        ];

        // when (操作):
        let results: Vec<bool> = inputs
            .iter()
            .map(|raw| serde_json::from_str::<ClientMessage>(raw).is_err())
            .collect();

        // then (期待する結果):
        assert_eq!(results, vec![true, true, true, true]);
    }

    #[test]
    fn test_serialize_your_id() {
        // テスト項目: yourId はブラウザクライアントが期待するフィールド名で出力される
        // given (前提条件):
        let msg = YourIdMessage {
            r#type: MessageType::YourId,
            message: "1a2b3c4d".to_string(),
            online_users: 3,
        };

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "yourId", "message": "1a2b3c4d", "onlineUsers": 3})
        );
    }

    #[test]
    fn test_serialize_call_event_omits_empty_reason() {
        // テスト項目: reason がない場合はフィールド自体が出力されない
        // given (前提条件):
        let msg = CallEventMessage {
            r#type: MessageType::CallEnded,
            id: "aaaa1111".to_string(),
            target: "bbbb2222".to_string(),
            username: Some("alice".to_string()),
            reason: None,
        };

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({"type": "call-ended", "id": "aaaa1111", "target": "bbbb2222", "username": "alice"})
        );
    }
}
