//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! Every method is one critical section over the `Lobby`: callers never see
//! a half-applied change.

use async_trait::async_trait;

use super::{
    CallAction, CallOutcome, ClientId, Departure, DisplayName, Identity, PresenceSnapshot,
    RepositoryError, SourceAddress, Timestamp,
};

#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// Admit a connection from `address` and register a fresh identity for it.
    async fn connect(
        &self,
        address: SourceAddress,
        connected_at: Timestamp,
    ) -> Result<Identity, RepositoryError>;

    /// Unregister an identity and release its admission slot (idempotent).
    async fn disconnect(&self, client_id: &ClientId) -> Option<Departure>;

    async fn set_display_name(
        &self,
        client_id: &ClientId,
        name: DisplayName,
    ) -> Result<Identity, RepositoryError>;

    async fn find_identity(&self, client_id: &ClientId) -> Option<Identity>;

    /// Named identities in registration order
    async fn list_active(&self) -> Vec<Identity>;

    async fn presence_snapshot(&self) -> PresenceSnapshot;

    async fn get_all_connected_client_ids(&self) -> Vec<ClientId>;

    async fn count_connected_clients(&self) -> usize;

    async fn apply_call(
        &self,
        action: CallAction,
        actor: &ClientId,
        target: &ClientId,
    ) -> CallOutcome;
}
