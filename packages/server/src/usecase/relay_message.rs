//! UseCase: チャットメッセージの中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - 検証 → 名前の有無 → コンテンツフィルタ → 配信 → 永続化 の順序
//!
//! ### なぜこのテストが必要か
//! - 送信者自身にはメッセージが届かないことを保証
//! - 永続化の失敗が配信を妨げないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：名前付きの送信者から他の全員への配信
//! - 異常系：空・長すぎるメッセージ、名前未設定、フィルタで拒否
//! - エッジケース：ストアへの保存失敗

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::domain::{
    ChatMessage, ClientId, ContentFilter, LobbyRepository, MessagePusher, MessageStore,
    MessageText, ServerEvent, Timestamp,
};

use super::error::RelayError;

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    message_store: Arc<dyn MessageStore>,
    content_filter: Arc<dyn ContentFilter>,
    clock: Arc<dyn Clock>,
    max_message_chars: usize,
}

impl RelayMessageUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        message_store: Arc<dyn MessageStore>,
        content_filter: Arc<dyn ContentFilter>,
        clock: Arc<dyn Clock>,
        max_message_chars: usize,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            message_store,
            content_filter,
            clock,
            max_message_chars,
        }
    }

    /// メッセージ中継を実行
    ///
    /// # Arguments
    ///
    /// * `sender_id` - 送信者のクライアント ID（送信元の接続）
    /// * `text` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ClientId>)` - 配信対象のクライアント ID リスト
    /// * `Err(RelayError)` - 拒否された（送信者には通知済み）
    pub async fn execute(
        &self,
        sender_id: &ClientId,
        text: String,
    ) -> Result<Vec<ClientId>, RelayError> {
        match self.relay(sender_id, text).await {
            Ok(targets) => Ok(targets),
            Err(e) => {
                tracing::warn!("Rejected message from '{}': {}", sender_id, e);
                if let Err(push_err) = self
                    .message_pusher
                    .push_to(sender_id, &ServerEvent::SystemNotice(e.to_string()))
                    .await
                {
                    tracing::warn!("Failed to push notice to '{}': {}", sender_id, push_err);
                }
                Err(e)
            }
        }
    }

    async fn relay(&self, sender_id: &ClientId, text: String) -> Result<Vec<ClientId>, RelayError> {
        // 1. 本文の検証
        let text = MessageText::new(text, self.max_message_chars)?;

        // 2. 送信者は名前を設定済みであること
        let sender_name = self
            .repository
            .find_identity(sender_id)
            .await
            .and_then(|identity| identity.display_name)
            .ok_or(RelayError::NotJoined)?;

        // 3. コンテンツフィルタ
        if self.content_filter.is_flagged(text.as_str()) {
            return Err(RelayError::Flagged);
        }

        let message = ChatMessage::new(
            sender_id.clone(),
            sender_name,
            text,
            Timestamp::new(self.clock.now_millis()),
        );

        // 4. 送信者以外の全クライアントに配信
        let targets: Vec<ClientId> = self
            .repository
            .get_all_connected_client_ids()
            .await
            .into_iter()
            .filter(|id| id != sender_id)
            .collect();
        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &ServerEvent::NewMessage(message.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast message from '{}': {}", sender_id, e);
        }
        tracing::debug!("Relayed message from '{}' to {} clients", sender_id, targets.len());

        // 5. 永続化（ベストエフォート）
        if let Err(e) = self.message_store.append(&message).await {
            tracing::warn!("Failed to persist message from '{}': {}", sender_id, e);
        }

        Ok(targets)
    }
}
