//! Infrastructure layer
//!
//! Concrete implementations of the collaborator traits declared by the
//! domain layer, plus the wire DTOs.

pub mod content_filter;
pub mod dto;
pub mod message_pusher;
pub mod message_store;
pub mod repository;
