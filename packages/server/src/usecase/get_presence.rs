//! UseCase: プレゼンス情報の取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{LobbyRepository, Profile};

/// Presence as seen from outside the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceView {
    /// Live connections, named or not
    pub online_users: usize,
    /// Named identities in registration order
    pub active: Vec<Profile>,
}

pub struct GetPresenceUseCase {
    repository: Arc<dyn LobbyRepository>,
}

impl GetPresenceUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> PresenceView {
        let snapshot = self.repository.presence_snapshot().await;
        PresenceView {
            online_users: snapshot.recipients.len(),
            active: snapshot.active,
        }
    }
}
