//! JSON Lines MessageStore 実装
//!
//! 1 メッセージを 1 行の JSON（`StoredMessageDto`）としてファイルに追記します。
//! 読み込み時は 1 行ずつ読み、直近 `limit` 件だけを保持します。
//! 壊れた行は警告を出して読み飛ばします。

use std::{collections::VecDeque, path::PathBuf};

use async_trait::async_trait;
use tokio::{
    fs,
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::Mutex,
};

use crate::{
    domain::{ChatMessage, MessageStore, StoreError},
    infrastructure::dto::websocket::StoredMessageDto,
};

/// Message history persisted to an append-only JSON-lines file
pub struct JsonLinesMessageStore {
    path: PathBuf,
    /// Serializes appends so lines never interleave
    write_lock: Mutex<()>,
}

impl JsonLinesMessageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_last(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let file = match fs::File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut lines = BufReader::new(file).lines();
        let mut messages = VecDeque::with_capacity(limit);
        let mut line_number = 0;
        while let Some(line) = lines.next_line().await? {
            line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            let parsed = serde_json::from_str::<StoredMessageDto>(&line)
                .map_err(|e| StoreError::Malformed(e.to_string()))
                .and_then(ChatMessage::try_from);
            match parsed {
                Ok(message) => {
                    if messages.len() == limit {
                        messages.pop_front();
                    }
                    messages.push_back(message);
                }
                Err(e) => tracing::warn!(
                    "Skipping line {} of '{}': {}",
                    line_number,
                    self.path.display(),
                    e
                ),
            }
        }
        Ok(messages.into())
    }
}

#[async_trait]
impl MessageStore for JsonLinesMessageStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(&StoredMessageDto::from(message))
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        self.read_last(limit).await
    }
}
