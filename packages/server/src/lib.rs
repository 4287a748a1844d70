//! Parlor: presence, chat and WebRTC call-signaling relay.
//!
//! Clients connect over WebSocket, pick a display name, chat with everyone
//! else and negotiate peer-to-peer calls through the server. The server only
//! relays small control payloads; media never passes through it.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// wiring
pub mod app;
pub mod config;

pub use app::{build_server, build_server_with};
pub use config::ServerConfig;
