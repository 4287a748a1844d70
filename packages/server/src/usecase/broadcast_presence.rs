//! UseCase: プレゼンス（オンライン一覧）のブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastPresenceUseCase::execute() メソッド
//! - 名前を持つクライアントの一覧が、接続中の全クライアントに送信されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：名前付き・名前なしのクライアントが混在する場合
//! - エッジケース：接続中のクライアントがいない場合
//! - 並行実行：同時にブロードキャストしても最後の送信が最新の状態になる

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{LobbyRepository, MessagePusher, ServerEvent};

/// プレゼンスブロードキャストのユースケース
///
/// Snapshots are taken and delivered while holding `gate`, so two concurrent
/// broadcasts never interleave: every client's last `activeClients` reflects
/// the latest registry state.
pub struct BroadcastPresenceUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: Mutex<()>,
}

impl BroadcastPresenceUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            gate: Mutex::new(()),
        }
    }

    /// プレゼンスを全クライアントに送信
    ///
    /// # Returns
    ///
    /// 送信に成功したクライアント数
    pub async fn execute(&self) -> usize {
        let _guard = self.gate.lock().await;

        let snapshot = self.repository.presence_snapshot().await;
        let mut delivered = 0;
        for recipient in snapshot.recipients {
            let event = ServerEvent::ActiveClients {
                active: snapshot.active.clone(),
                recipient: recipient.clone(),
            };
            match self.message_pusher.push_to(&recipient.id, &event).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!("Failed to push presence to '{}': {}", recipient.id, e);
                }
            }
        }

        tracing::debug!(
            "Presence broadcast: {} active, delivered to {}",
            snapshot.active.len(),
            delivered
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Profile;
    use crate::usecase::test_support::{RecordingPusher, create_test_repository, join};

    fn names(active: &[Profile]) -> Vec<String> {
        active
            .iter()
            .map(|p| {
                p.display_name
                    .as_ref()
                    .map(|n| n.as_str().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_broadcast_presence_reaches_every_connection() {
        // テスト項目: 名前なしのクライアントにも一覧が届き、一覧には名前付きのみが含まれる
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingPusher::default());
        let alice = join(&repository, Some("alice")).await;
        let lurker = join(&repository, None).await;
        let bob = join(&repository, Some("bob")).await;
        let usecase = BroadcastPresenceUseCase::new(repository.clone(), pusher.clone());

        // when (操作):
        let delivered = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(delivered, 3);
        for client in [&alice, &lurker, &bob] {
            let events = pusher.events_for(&client.id);
            assert_eq!(events.len(), 1);
            match &events[0] {
                ServerEvent::ActiveClients { active, recipient } => {
                    assert_eq!(names(active), vec!["alice", "bob"]);
                    assert_eq!(recipient.id, client.id);
                    assert_eq!(recipient.display_name, client.display_name);
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_broadcast_presence_with_no_clients() {
        // テスト項目: 接続中のクライアントがいない場合は何も送信されない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = BroadcastPresenceUseCase::new(repository, pusher.clone());

        // when (操作):
        let delivered = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
        assert!(pusher.all_events().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_broadcasts_end_with_latest_snapshot() {
        // テスト項目: 並行したブロードキャストの後、各クライアントの最後の一覧が最新状態になる
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingPusher::default());
        let alice = join(&repository, Some("alice")).await;
        let usecase = Arc::new(BroadcastPresenceUseCase::new(
            repository.clone(),
            pusher.clone(),
        ));

        // when (操作):
        let mut handles = Vec::new();
        for name in ["bob", "carol", "dave"] {
            let repository = repository.clone();
            let usecase = usecase.clone();
            handles.push(tokio::spawn(async move {
                join(&repository, Some(name)).await;
                usecase.execute().await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let last = pusher.events_for(&alice.id).pop().unwrap();
        match last {
            ServerEvent::ActiveClients { active, .. } => assert_eq!(active.len(), 4),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
