//! `PartitionError`: unified error type for hypercut public APIs.
//!
//! Parsers and the orchestrator fail fast with a descriptive error;
//! algorithm-internal contract violations are `debug_assert!`s and never
//! surface here.

use thiserror::Error;

/// Unified error type for hypercut operations.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// The `.hgr` header line is missing or does not parse.
    #[error("malformed header in `{path}`: {reason}")]
    MalformedHeader { path: String, reason: String },
    /// A pin id in an input file lies outside `1..=num_hypernodes`.
    #[error("pin {pin} out of range 1..={num_hypernodes} (line {line} of `{path}`)")]
    PinOutOfRange {
        path: String,
        line: usize,
        pin: u64,
        num_hypernodes: u64,
    },
    /// A weight in an input file is zero, negative, or not an integer.
    #[error("invalid weight `{token}` on line {line} of `{path}` (weights must be positive integers)")]
    InvalidWeight {
        path: String,
        line: usize,
        token: String,
    },
    /// A line of an input file could not be tokenized as expected.
    #[error("malformed line {line} of `{path}`: {reason}")]
    MalformedLine {
        path: String,
        line: usize,
        reason: String,
    },
    /// Fewer hyperedge or weight lines than the header announced.
    #[error("`{path}` ended early: expected {expected} {what} lines, found {found}")]
    TruncatedFile {
        path: String,
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// `k < 2` makes partitioning meaningless.
    #[error("number of blocks k must be at least 2, got {0}")]
    KTooSmall(u32),
    /// A negative imbalance tolerance is infeasible.
    #[error("imbalance tolerance epsilon must be non-negative, got {0}")]
    NegativeEpsilon(f64),
    /// A single vertex is heavier than the coarsening weight limit allows.
    #[error("hypernode {hn} has weight {weight}, exceeding max_vertex_weight {limit}")]
    NodeTooHeavy { hn: u32, weight: i64, limit: i64 },
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PartitionError>;
