//! Data Transfer Objects (DTOs) for the relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs (the wire protocol)
//! - `http`: HTTP API response DTOs
//! - `conversion`: domain ↔ DTO conversion and event encoding

pub mod conversion;
pub mod http;
pub mod websocket;
