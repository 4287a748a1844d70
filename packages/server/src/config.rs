//! Server configuration.

use std::path::PathBuf;

use crate::domain::{
    DEFAULT_MAX_CONNECTIONS_PER_ADDRESS, DEFAULT_MAX_DISPLAY_NAME_CHARS, DEFAULT_MAX_MESSAGE_CHARS,
};

/// Every tunable of the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Admission cap per source address
    pub max_connections_per_address: usize,
    pub max_display_name_chars: usize,
    pub max_message_chars: usize,
    /// Messages replayed to a client after it names itself
    pub recent_history_len: usize,
    /// JSON-lines history file; history is kept in memory when unset
    pub history_file: Option<PathBuf>,
    /// Added to the built-in blocked word list
    pub blocked_words: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_connections_per_address: DEFAULT_MAX_CONNECTIONS_PER_ADDRESS,
            max_display_name_chars: DEFAULT_MAX_DISPLAY_NAME_CHARS,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            recent_history_len: 10,
            history_file: None,
            blocked_words: Vec::new(),
        }
    }
}
