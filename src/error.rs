// src/error.rs
use thiserror::Error;

/// Core error taxonomy. `DuplicateTitle` and `MalformedTimestamp` are not
/// here on purpose: the first is a normal `Skipped` ingestion outcome, the
/// second is recovered locally (ingestion proceeds with no timestamp).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankerError {
    #[error("invalid label {0}: expected -1, 0 or 1")]
    InvalidLabel(i64),

    #[error("item not found: {0}")]
    ItemNotFound(i64),

    /// Not surfaced to end users; a recognized orchestrator outcome that
    /// leaves prior scores intact.
    #[error("not enough data to train: {0}")]
    InsufficientData(String),
}
