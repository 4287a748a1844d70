//! UseCase: 表示名の設定（addUsername）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SetDisplayNameUseCase::execute() メソッド
//! - 名前の検証、Registry への反映、履歴の送信、プレゼンスの再送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：名前を設定すると recentMessages → activeClients の順に届く
//! - 正常系：名前の再設定（後勝ち）
//! - 異常系：空・長すぎる名前は送信者にだけ通知され、状態は変わらない
//! - 異常系：履歴ストアの失敗時は空の履歴が送られる

use std::sync::Arc;

use crate::domain::{
    ClientId, DisplayName, Identity, LobbyRepository, MessagePusher, MessageStore,
    RepositoryError, ServerEvent,
};

use super::{broadcast_presence::BroadcastPresenceUseCase, error::SetDisplayNameError};

/// 表示名設定のユースケース
pub struct SetDisplayNameUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    message_store: Arc<dyn MessageStore>,
    presence: Arc<BroadcastPresenceUseCase>,
    max_display_name_chars: usize,
    recent_history_len: usize,
}

impl SetDisplayNameUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        message_store: Arc<dyn MessageStore>,
        presence: Arc<BroadcastPresenceUseCase>,
        max_display_name_chars: usize,
        recent_history_len: usize,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            message_store,
            presence,
            max_display_name_chars,
            recent_history_len,
        }
    }

    /// 表示名の設定を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 名前を設定するクライアント（送信元の接続）
    /// * `raw_name` - クライアントが送ってきた名前
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - 更新後の Identity
    /// * `Err(SetDisplayNameError)` - 検証エラー、または接続が既に存在しない
    pub async fn execute(
        &self,
        client_id: &ClientId,
        raw_name: String,
    ) -> Result<Identity, SetDisplayNameError> {
        // 1. 名前の検証（失敗は送信者にのみ通知）
        let name = match DisplayName::new(raw_name, self.max_display_name_chars) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Rejected display name from '{}': {}", client_id, e);
                self.notify(client_id, e.to_string()).await;
                return Err(e.into());
            }
        };

        // 2. Registry に反映
        let identity = self
            .repository
            .set_display_name(client_id, name)
            .await
            .map_err(|e| match e {
                RepositoryError::ClientNotFound(id) | RepositoryError::AdmissionRejected(id) => {
                    SetDisplayNameError::ClientNotFound(id)
                }
            })?;

        tracing::info!(
            "Client '{}' is now known as '{}'",
            identity.id,
            identity
                .display_name
                .as_ref()
                .map(DisplayName::as_str)
                .unwrap_or_default()
        );

        // 3. 直近の履歴を本人に送信
        let history = match self.message_store.recent(self.recent_history_len).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Failed to load recent messages: {}", e);
                Vec::new()
            }
        };
        if let Err(e) = self
            .message_pusher
            .push_to(client_id, &ServerEvent::RecentMessages(history))
            .await
        {
            tracing::warn!("Failed to push recent messages to '{}': {}", client_id, e);
        }

        // 4. 全員にプレゼンスを再送信
        self.presence.execute().await;

        Ok(identity)
    }

    async fn notify(&self, client_id: &ClientId, notice: String) {
        if let Err(e) = self
            .message_pusher
            .push_to(client_id, &ServerEvent::SystemNotice(notice))
            .await
        {
            tracing::warn!("Failed to push notice to '{}': {}", client_id, e);
        }
    }
}
