//! Content policy check, consumed as an external collaborator.

#[cfg_attr(test, mockall::automock)]
pub trait ContentFilter: Send + Sync {
    /// `true` when `text` must not be relayed.
    fn is_flagged(&self, text: &str) -> bool;
}
