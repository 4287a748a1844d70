//! InMemory Lobby Repository 実装
//!
//! ドメイン層が定義する LobbyRepository trait の具体的な実装。
//! `Lobby` 集約を単一の Mutex で保護し、各メソッドを 1 つのクリティカルセクションとして実行します。
//!
//! Admission と登録、登録解除と接続枠の解放はそれぞれ同じロックの中で行われるため、
//! 接続数カウンタと Registry がずれることはありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    CallAction, CallOutcome, CallState, ClientId, Departure, DisplayName, Identity, Lobby,
    LobbyRepository, PresenceSnapshot, RepositoryError, SourceAddress, Timestamp,
};

/// インメモリ Lobby Repository 実装
pub struct InMemoryLobbyRepository {
    lobby: Arc<Mutex<Lobby>>,
}

impl InMemoryLobbyRepository {
    pub fn new(lobby: Arc<Mutex<Lobby>>) -> Self {
        Self { lobby }
    }

    /// Current number of admitted connections from `address`
    pub async fn connections_from(&self, address: &SourceAddress) -> usize {
        self.lobby.lock().await.connections_from(address)
    }

    pub async fn call_state(&self, client_id: &ClientId) -> CallState {
        self.lobby.lock().await.calls().state_of(client_id)
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn connect(
        &self,
        address: SourceAddress,
        connected_at: Timestamp,
    ) -> Result<Identity, RepositoryError> {
        let mut lobby = self.lobby.lock().await;
        lobby.connect(address, connected_at)
    }

    async fn disconnect(&self, client_id: &ClientId) -> Option<Departure> {
        let mut lobby = self.lobby.lock().await;
        lobby.disconnect(client_id)
    }

    async fn set_display_name(
        &self,
        client_id: &ClientId,
        name: DisplayName,
    ) -> Result<Identity, RepositoryError> {
        let mut lobby = self.lobby.lock().await;
        lobby.set_display_name(client_id, name)
    }

    async fn find_identity(&self, client_id: &ClientId) -> Option<Identity> {
        let lobby = self.lobby.lock().await;
        lobby.identity(client_id).cloned()
    }

    async fn list_active(&self) -> Vec<Identity> {
        let lobby = self.lobby.lock().await;
        lobby.list_active()
    }

    async fn presence_snapshot(&self) -> PresenceSnapshot {
        let lobby = self.lobby.lock().await;
        lobby.presence_snapshot()
    }

    async fn get_all_connected_client_ids(&self) -> Vec<ClientId> {
        let lobby = self.lobby.lock().await;
        lobby.client_ids()
    }

    async fn count_connected_clients(&self) -> usize {
        let lobby = self.lobby.lock().await;
        lobby.connection_count()
    }

    async fn apply_call(
        &self,
        action: CallAction,
        actor: &ClientId,
        target: &ClientId,
    ) -> CallOutcome {
        let mut lobby = self.lobby.lock().await;
        lobby.apply_call(action, actor, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryLobbyRepository の接続・切断と接続数カウンタの整合性
    // - 並行した接続・切断の後もカウンタが Registry と一致すること
    //
    // 【どのようなシナリオをテストするか】
    // 1. 接続と切断
    // 2. 上限を超える接続の拒否
    // 3. 多数のタスクからの並行した接続・切断
    // ========================================

    fn create_test_repository(cap: usize) -> Arc<InMemoryLobbyRepository> {
        Arc::new(InMemoryLobbyRepository::new(Arc::new(Mutex::new(
            Lobby::new(cap),
        ))))
    }

    fn address(last: u8) -> SourceAddress {
        SourceAddress::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, last)))
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        // テスト項目: 接続すると Registry とカウンタに反映され、切断で元に戻る
        // given (前提条件):
        let repo = create_test_repository(5);

        // when (操作):
        let identity = repo.connect(address(1), Timestamp::new(1)).await.unwrap();
        let while_connected = (
            repo.count_connected_clients().await,
            repo.connections_from(&address(1)).await,
        );
        let departure = repo.disconnect(&identity.id).await;

        // then (期待する結果):
        assert_eq!(while_connected, (1, 1));
        assert_eq!(departure.unwrap().identity, identity);
        assert_eq!(repo.count_connected_clients().await, 0);
        assert_eq!(repo.connections_from(&address(1)).await, 0);
    }

    #[tokio::test]
    async fn test_connect_over_cap_is_rejected_per_address() {
        // テスト項目: 上限はアドレスごとに数えられる
        // given (前提条件):
        let repo = create_test_repository(1);
        repo.connect(address(1), Timestamp::new(1)).await.unwrap();

        // when (操作):
        let same = repo.connect(address(1), Timestamp::new(2)).await;
        let other = repo.connect(address(2), Timestamp::new(3)).await;

        // then (期待する結果):
        assert_eq!(
            same,
            Err(RepositoryError::AdmissionRejected("10.0.0.1".to_string()))
        );
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_connect_disconnect_keeps_counters_consistent() {
        // テスト項目: 並行した接続・切断の後、カウンタは生きている接続数と一致する
        // given (前提条件):
        let repo = create_test_repository(3);

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..40u8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let addr = address(i % 4);
                match repo.connect(addr, Timestamp::new(i as i64)).await {
                    Ok(identity) if i % 2 == 0 => {
                        repo.disconnect(&identity.id).await;
                        repo.disconnect(&identity.id).await;
                    }
                    _ => {}
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let total: usize = {
            let mut total = 0;
            for i in 0..4 {
                let count = repo.connections_from(&address(i)).await;
                assert!(count <= 3);
                total += count;
            }
            total
        };
        assert_eq!(total, repo.count_connected_clients().await);
    }
}
