//! UseCase: 直近のメッセージ履歴の取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageStore, StoreError};

/// Upper bound on `limit`
pub const MAX_HISTORY_LIMIT: usize = 100;

pub struct GetRecentMessagesUseCase {
    message_store: Arc<dyn MessageStore>,
}

impl GetRecentMessagesUseCase {
    pub fn new(message_store: Arc<dyn MessageStore>) -> Self {
        Self { message_store }
    }

    /// 直近 `limit` 件（最大 100 件）を古い順に返す
    pub async fn execute(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        self.message_store
            .recent(limit.min(MAX_HISTORY_LIMIT))
            .await
    }
}
