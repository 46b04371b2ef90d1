//! Error types for the deduplication engine.

use super::models::RecordId;

/// Malformed input that aborts a planning run before any decision is made.
///
/// Ambiguous or unmatched names are never errors; they end up in
/// [`Plan::skipped`](super::models::Plan::skipped).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("record at index {index} has an empty id")]
    MissingId { index: usize },
    #[error("duplicate record id {id} at indices {first} and {second}")]
    DuplicateId {
        id: RecordId,
        first: usize,
        second: usize,
    },
}
