//! WebSocket session entry point.
//!
//! One connection is served by two tasks: a receive loop that dispatches
//! inbound messages to the use cases in arrival order, and a pusher loop that
//! drains the connection's outbound channel into the socket. When either
//! ends, the other is aborted and the client is disconnected exactly once.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, ServerEvent, SignalPayload, SourceAddress},
    infrastructure::dto::{conversion::encode_event, websocket::ClientMessage},
    ui::state::AppState,
    usecase::{CallCommand, ConnectError},
};

/// Close reason sent when an address is over its connection cap
pub const POLICY_CLOSE_REASON: &str = "too many connections from this address";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    let address = SourceAddress::from(peer.ip());
    ws.on_upgrade(move |socket| handle_socket(socket, state, address))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver for this client's outbound messages
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Complete the upgrade with a policy-violation close.
async fn reject(mut socket: WebSocket) {
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: Utf8Bytes::from_static(POLICY_CLOSE_REASON),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!("Failed to send policy close: {}", e);
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, address: SourceAddress) {
    // 1. Admission + Registry 登録
    let (tx, rx) = mpsc::unbounded_channel();
    let connected = match state.connect_client_usecase.execute(address, tx).await {
        Ok(connected) => connected,
        Err(ConnectError::AdmissionRejected(addr)) => {
            tracing::warn!("Too many connections from {}, closing with policy code", addr);
            reject(socket).await;
            return;
        }
        Err(e) => {
            tracing::error!("Failed to register client from {}: {}", address, e);
            return;
        }
    };
    let client_id = connected.identity.id.clone();
    let (mut sender, mut receiver) = socket.split();

    // 2. yourId を送信（他のどのメッセージよりも先に届く）
    let welcome = ServerEvent::Welcome {
        id: client_id.clone(),
        online_users: connected.online_users,
    };
    let delivered = match encode_event(&welcome) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to encode welcome for '{}': {}", client_id, e);
            false
        }
    };
    if !delivered {
        tracing::warn!("Failed to send welcome to '{}'", client_id);
        state.disconnect_client_usecase.execute(&client_id).await;
        return;
    }

    // 3. 受信ループ
    let state_clone = state.clone();
    let client_id_clone = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error from '{}': {}", client_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch(&state_clone, &client_id_clone, text.as_str()).await;
                }
                Message::Binary(_) => {
                    tracing::warn!("Dropped binary message from '{}'", client_id_clone);
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    });

    // 4. 送信ループ
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // 5. 切断処理（Registry 削除、接続枠の解放、通話相手への通知、プレゼンス再送信）
    state.disconnect_client_usecase.execute(&client_id).await;
}

/// Route one inbound text message to its use case.
///
/// Malformed JSON and unknown types are logged and dropped; the connection
/// stays open.
async fn dispatch(state: &AppState, client_id: &ClientId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Dropped malformed message from '{}': {}", client_id, e);
            return;
        }
    };

    match message {
        ClientMessage::AddUsername {
            message,
            client_id: claimed,
        } => {
            if let Some(claimed) = claimed.filter(|claimed| claimed != client_id.as_str()) {
                tracing::debug!(
                    "Ignoring clientId '{}' in addUsername from '{}'",
                    claimed,
                    client_id
                );
            }
            if let Err(e) = state
                .set_display_name_usecase
                .execute(client_id, message)
                .await
            {
                tracing::debug!("addUsername from '{}' failed: {}", client_id, e);
            }
        }
        ClientMessage::NewMessage { message } => {
            if let Err(e) = state.relay_message_usecase.execute(client_id, message).await {
                tracing::debug!("newMessage from '{}' failed: {}", client_id, e);
            }
        }
        ClientMessage::CallRequest { target } => {
            call(state, client_id, target, CallCommand::Request).await;
        }
        ClientMessage::CallAccepted { target } => {
            call(state, client_id, target, CallCommand::Accept).await;
        }
        ClientMessage::CallRejected { target } => {
            call(state, client_id, target, CallCommand::Reject).await;
        }
        ClientMessage::CallEnded { target } => {
            call(state, client_id, target, CallCommand::End).await;
        }
        ClientMessage::WebRtcSignal { target, sdp, ice } => {
            match SignalPayload::from_parts(sdp, ice) {
                Some(payload) => {
                    call(state, client_id, target, CallCommand::Signal(payload)).await;
                }
                None => tracing::warn!(
                    "Dropped webrtc-signal from '{}': exactly one of sdp or ice is required",
                    client_id
                ),
            }
        }
        ClientMessage::Unknown => {
            tracing::warn!("Dropped message with unknown type from '{}'", client_id);
        }
    }
}

async fn call(state: &AppState, actor: &ClientId, target: String, command: CallCommand) {
    let target = match ClientId::new(target) {
        Ok(target) => target,
        Err(e) => {
            tracing::warn!("Dropped call event from '{}': {}", actor, e);
            return;
        }
    };
    state
        .call_signaling_usecase
        .execute(actor, &target, command)
        .await;
}
