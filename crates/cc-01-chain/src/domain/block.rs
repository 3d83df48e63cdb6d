//! The sealed block and its proof-of-work search.

use super::error::{ChainError, ChainResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::Transaction;

/// One sealed unit of a chain.
///
/// The hash preimage is the plain-text concatenation
/// `index ‖ timestamp ‖ canonical_json(transactions) ‖ prev_hash ‖ nonce`
/// with integers in decimal. Any implementation that concatenates
/// differently produces a different (still internally consistent) ledger,
/// so this layout is a portability contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, starting at 0.
    pub index: u64,
    /// Ordered sequence of tagged records.
    pub transactions: Vec<Transaction>,
    /// ISO-8601 instant the block was built.
    pub timestamp: String,
    /// Hash of the predecessor; sentinel or parent-chain hash for block 0.
    pub prev_hash: String,
    /// Nonce found by the proof-of-work search.
    pub nonce: u64,
    /// Lowercase hex SHA-256 digest of the preimage.
    pub hash: String,
}

impl Block {
    /// Build an unsealed block with `nonce = 0` and its initial hash.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        timestamp: String,
        prev_hash: String,
    ) -> ChainResult<Self> {
        let mut block = Self {
            index,
            transactions,
            timestamp,
            prev_hash,
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash()?;
        Ok(block)
    }

    /// Recompute the digest over the block's fields (excluding `hash`).
    pub fn compute_hash(&self) -> ChainResult<String> {
        let tx_json = serde_json::to_string(&self.transactions)?;
        let mut hasher = Sha256::new();
        hasher.update(self.index.to_string().as_bytes());
        hasher.update(self.timestamp.as_bytes());
        hasher.update(tx_json.as_bytes());
        hasher.update(self.prev_hash.as_bytes());
        hasher.update(self.nonce.to_string().as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    /// Search for the smallest nonce whose digest carries the difficulty
    /// prefix, then seal the block with it.
    ///
    /// Deterministic: identical fields and difficulty always yield the
    /// identical `(nonce, hash)`. The search is bounded by
    /// `max_iterations`; exhausting the budget returns
    /// [`ChainError::MiningLimitExceeded`].
    pub fn mine(&mut self, difficulty_prefix: &str, max_iterations: u64) -> ChainResult<String> {
        let mut probes: u64 = 0;
        while !self.hash.starts_with(difficulty_prefix) {
            if probes >= max_iterations {
                return Err(ChainError::MiningLimitExceeded {
                    limit: max_iterations,
                    prefix: difficulty_prefix.to_string(),
                });
            }
            self.nonce += 1;
            probes += 1;
            self.hash = self.compute_hash()?;
        }
        Ok(self.hash.clone())
    }

    /// Whether the sealed hash satisfies a difficulty prefix.
    pub fn satisfies_difficulty(&self, difficulty_prefix: &str) -> bool {
        self.hash.starts_with(difficulty_prefix)
    }
}
