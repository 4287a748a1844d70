//! Utilities shared between Parlor binaries and libraries.

pub mod logger;
pub mod time;
