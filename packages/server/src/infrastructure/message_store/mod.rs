//! MessageStore 実装
//!
//! - `inmemory`: プロセス内に直近の一定件数だけを保持（再起動で消える）
//! - `jsonl`: 1 行 1 メッセージの追記型ファイル

pub mod inmemory;
pub mod jsonl;

pub use inmemory::InMemoryMessageStore;
pub use jsonl::JsonLinesMessageStore;
