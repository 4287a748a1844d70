//! メッセージ送信（通知）の抽象化
//!
//! UseCase 層はこの trait を通してクライアントにイベントを送信します。
//! 送信方式（WebSocket など）は Infrastructure 層が実装します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ClientId, MessagePushError, ServerEvent};

/// Outbound channel of one connection (already-encoded wire messages)
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    async fn unregister_client(&self, client_id: &ClientId);

    /// Push one event to one client.
    async fn push_to(
        &self,
        client_id: &ClientId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// Push the same event to every target. Individual failures are logged
    /// and skipped; only an encoding failure aborts the broadcast.
    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
