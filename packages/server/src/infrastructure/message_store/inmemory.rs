//! InMemory MessageStore 実装
//!
//! 直近 `retention` 件だけを保持し、それより古いメッセージは追記時に捨てます。

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageStore, StoreError};

/// Bounded message history kept in memory
pub struct InMemoryMessageStore {
    messages: Mutex<VecDeque<ChatMessage>>,
    retention: usize,
}

impl InMemoryMessageStore {
    /// Keep at most `retention` messages (oldest dropped first).
    pub fn with_retention(retention: usize) -> Self {
        Self {
            messages: Mutex::new(VecDeque::with_capacity(retention)),
            retention,
        }
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        if self.retention == 0 {
            return Ok(());
        }
        let mut messages = self.messages.lock().await;
        while messages.len() >= self.retention {
            messages.pop_front();
        }
        messages.push_back(message.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.lock().await;
        let start = messages.len().saturating_sub(limit);
        Ok(messages.range(start..).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, DisplayName, MessageText, Timestamp};

    fn message(text: &str) -> ChatMessage {
        ChatMessage::new(
            ClientId::new("aaaa1111".to_string()).unwrap(),
            DisplayName::try_from("alice".to_string()).unwrap(),
            MessageText::try_from(text.to_string()).unwrap(),
            Timestamp::new(1),
        )
    }

    #[tokio::test]
    async fn test_recent_returns_last_messages_oldest_first() {
        // テスト項目: 直近 n 件が古い順に返される
        // given (前提条件):
        let store = InMemoryMessageStore::with_retention(10);
        for text in ["one", "two", "three"] {
            store.append(&message(text)).await.unwrap();
        }

        // when (操作):
        let recent = store.recent(2).await.unwrap();

        // then (期待する結果):
        assert_eq!(recent, vec![message("two"), message("three")]);
    }

    #[tokio::test]
    async fn test_recent_with_fewer_messages_than_limit() {
        // テスト項目: 件数が上限に満たない場合は全件が返される
        // given (前提条件):
        let store = InMemoryMessageStore::with_retention(10);
        store.append(&message("one")).await.unwrap();

        // when (操作):
        let recent = store.recent(10).await.unwrap();
        let none = store.recent(0).await.unwrap();

        // then (期待する結果):
        assert_eq!(recent, vec![message("one")]);
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_append_past_retention_drops_oldest() {
        // テスト項目: 保持件数を超えて追記すると古いものから捨てられ、件数は上限を超えない
        // given (前提条件):
        let store = InMemoryMessageStore::with_retention(3);

        // when (操作):
        for text in ["one", "two", "three", "four", "five"] {
            store.append(&message(text)).await.unwrap();
        }
        let recent = store.recent(10).await.unwrap();

        // then (期待する結果):
        assert_eq!(store.messages.lock().await.len(), 3);
        assert_eq!(
            recent,
            vec![message("three"), message("four"), message("five")]
        );
    }
}
