//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - アドレスごとの接続数制限（admission）と Identity の登録
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規クライアントの接続（ID 採番、接続数の返却）
//! - 異常系：同一アドレスからの接続数上限超過

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::domain::{
    Identity, LobbyRepository, MessagePusher, PusherChannel, RepositoryError, SourceAddress,
    Timestamp,
};

use super::error::ConnectError;

/// Result of a successful connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connected {
    pub identity: Identity,
    /// Live connections including the new one
    pub online_users: usize,
}

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `address` - 接続元アドレス
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Connected)` - 接続成功（採番された Identity と接続数）
    /// * `Err(ConnectError)` - 接続数上限により拒否
    pub async fn execute(
        &self,
        address: SourceAddress,
        sender: PusherChannel,
    ) -> Result<Connected, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now_millis());

        // 1. Admission + 登録（同一ロック内）
        let identity = self
            .repository
            .connect(address, connected_at)
            .await
            .map_err(|e| match e {
                RepositoryError::AdmissionRejected(addr) => ConnectError::AdmissionRejected(addr),
                other => ConnectError::Repository(other),
            })?;

        // 2. MessagePusher にクライアントを登録
        self.message_pusher
            .register_client(identity.id.clone(), sender)
            .await;

        let online_users = self.repository.count_connected_clients().await;

        tracing::info!(
            "Client '{}' connected from {} ({} online)",
            identity.id,
            address,
            online_users
        );

        Ok(Connected {
            identity,
            online_users,
        })
    }
}
