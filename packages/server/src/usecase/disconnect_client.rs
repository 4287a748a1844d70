//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - Registry からの削除、接続枠の解放、通話相手への終了通知、プレゼンスの再送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：通常の切断
//! - 正常系：通話中の切断（相手に call-ended が届く）
//! - 正常系：呼び出し中の着信側の切断（発信者に call-rejected が届く）
//! - エッジケース：二重の切断呼び出し（冪等）

use std::sync::Arc;

use crate::domain::{
    CallState, ClientId, Departure, LobbyRepository, MessagePusher, ServerEvent,
};

use super::broadcast_presence::BroadcastPresenceUseCase;

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<BroadcastPresenceUseCase>,
}

impl DisconnectClientUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        presence: Arc<BroadcastPresenceUseCase>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            presence,
        }
    }

    /// クライアント切断を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 切断するクライアント ID
    ///
    /// # Returns
    ///
    /// * `Some(Departure)` - 切断したクライアントの情報
    /// * `None` - 既に切断済み（何もしない）
    pub async fn execute(&self, client_id: &ClientId) -> Option<Departure> {
        // 1. Registry から削除し、接続枠を解放（同一ロック内）
        let departure = self.repository.disconnect(client_id).await?;

        // 2. MessagePusher からクライアントを削除
        self.message_pusher.unregister_client(client_id).await;

        // 3. 通話相手に終了を通知（発信中の相手には call-rejected、それ以外は call-ended）
        if let Some(peer) = &departure.call_peer {
            let from = departure.identity.profile();
            let target = peer.id.clone();
            let event = match peer.state {
                CallState::Calling => ServerEvent::CallRejected {
                    from,
                    target,
                    reason: None,
                },
                _ => ServerEvent::CallEnded { from, target },
            };
            if let Err(e) = self.message_pusher.push_to(&peer.id, &event).await {
                tracing::warn!("Failed to push call teardown to '{}': {}", peer.id, e);
            }
        }

        tracing::info!("Client '{}' disconnected", client_id);

        // 4. 残りの全員にプレゼンスを再送信
        self.presence.execute().await;

        Some(departure)
    }
}
