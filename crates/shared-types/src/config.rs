//! # Ledger Configuration
//!
//! The difficulty prefix and operational bounds are threaded explicitly
//! through chain construction, the services, and the validator. Tests run a
//! cheap prefix without touching production configuration.

use serde::{Deserialize, Serialize};

/// Sentinel `prev_hash` of every root-tier (department) genesis block.
pub const GENESIS_SENTINEL: &str = "0";

/// Configuration shared by the mining, append and validation paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Required leading substring of every sealed hash.
    pub difficulty_prefix: String,
    /// Upper bound on nonce probes per block. Exceeding it means the
    /// difficulty is unreachable for the digest distribution and is a fatal
    /// configuration error, never an unbounded spin.
    pub max_mining_iterations: u64,
    /// How many times an append is retried after a concurrent-writer
    /// conflict before surfacing the failure.
    pub max_append_retries: u32,
}

impl LedgerConfig {
    /// Cheap-difficulty configuration for tests (`"00"`, 256 expected probes).
    pub fn for_tests() -> Self {
        Self {
            difficulty_prefix: "00".to_string(),
            ..Self::default()
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            // Four leading hex zeros: ~65k expected SHA-256 probes per block.
            difficulty_prefix: "0000".to_string(),
            max_mining_iterations: 50_000_000,
            max_append_retries: 5,
        }
    }
}
