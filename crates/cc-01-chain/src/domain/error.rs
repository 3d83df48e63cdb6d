//! Error types for the chain core.

use shared_types::ChainId;
use thiserror::Error;

/// Chain error taxonomy.
///
/// Only [`ChainError::AppendConflict`] is locally recoverable (re-read the
/// tip and retry, bounded by `LedgerConfig::max_append_retries`). Every
/// other kind is fatal for the operation that raised it; the chain is left
/// untouched because a block is appended whole or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Append targeted a chain that was expected to exist but is absent or
    /// empty.
    #[error("Chain not found or empty: {0}")]
    ChainNotFound(ChainId),

    /// Genesis requested on a chain that already has blocks.
    #[error("Genesis already exists for chain {0}")]
    GenesisAlreadyExists(ChainId),

    /// Stored hash does not match the recomputed digest.
    #[error("Hash mismatch at block {index}: stored hash does not match recomputed digest")]
    HashMismatch { index: u64 },

    /// Sealed hash lacks the required difficulty prefix.
    #[error("Proof of work failed at block {index}: hash lacks difficulty prefix {prefix:?}")]
    ProofOfWorkFailed { index: u64, prefix: String },

    /// `prev_hash` does not match the expected predecessor, or a block's
    /// index breaks the strict 0,1,2,... sequence.
    #[error("Link broken at block {index}: prev_hash does not match expected predecessor")]
    LinkBroken { index: u64 },

    /// A child chain's genesis `prev_hash` is not a member of its parent
    /// chain's hash set (cross-tier link).
    #[error("Genesis link broken: parent chain does not contain the referenced hash")]
    GenesisLinkBroken,

    /// A concurrent writer advanced the tip between read and append.
    #[error("Append conflict on chain {0}: tip advanced by a concurrent writer")]
    AppendConflict(ChainId),

    /// The nonce search exhausted its budget. The difficulty prefix is
    /// unreachable for the digest distribution; this is a configuration
    /// error, never an unbounded spin.
    #[error("Mining exceeded {limit} iterations for difficulty prefix {prefix:?}")]
    MiningLimitExceeded { limit: u64, prefix: String },

    /// Canonical transaction serialization failed.
    #[error("Canonical serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::Serialization(err.to_string())
    }
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
