//! Parlor relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parlor-server
//! cargo run --bin parlor-server -- --host 0.0.0.0 --port 3000 --history-file history.jsonl
//! ```

use std::path::PathBuf;

use clap::Parser;
use parlor_server::{ServerConfig, build_server};
use parlor_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "parlor-server")]
#[command(about = "Presence, chat and call-signaling relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "PARLOR_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PARLOR_PORT", default_value = "8080")]
    port: u16,

    /// Concurrent connections allowed from one source address
    #[arg(long, env = "PARLOR_MAX_CONNECTIONS_PER_ADDRESS", default_value = "5")]
    max_connections_per_address: usize,

    /// Maximum display name length in characters
    #[arg(long, env = "PARLOR_MAX_DISPLAY_NAME_CHARS", default_value = "10")]
    max_display_name_chars: usize,

    /// Maximum chat message length in characters
    #[arg(long, env = "PARLOR_MAX_MESSAGE_CHARS", default_value = "100")]
    max_message_chars: usize,

    /// Messages replayed to a client after it sets its name
    #[arg(long, env = "PARLOR_RECENT_HISTORY_LEN", default_value = "10")]
    recent_history_len: usize,

    /// JSON-lines file to persist chat history to (in memory when omitted)
    #[arg(long, env = "PARLOR_HISTORY_FILE")]
    history_file: Option<PathBuf>,

    /// Extra words for the content filter (comma separated)
    #[arg(long, env = "PARLOR_BLOCKED_WORDS", value_delimiter = ',')]
    blocked_words: Vec<String>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "PARLOR_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_connections_per_address: args.max_connections_per_address,
            max_display_name_chars: args.max_display_name_chars,
            max_message_chars: args.max_message_chars,
            recent_history_len: args.recent_history_len,
            history_file: args.history_file,
            blocked_words: args.blocked_words,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(args);
    tracing::debug!("Starting with {:?}", config);

    let server = build_server(&config);
    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
