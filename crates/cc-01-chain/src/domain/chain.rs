//! The per-entity append-only chain.

use super::block::Block;
use super::error::{ChainError, ChainResult};
use shared_types::{ChainId, LedgerConfig, Transaction, GENESIS_SENTINEL};

/// An ordered, append-only sequence of blocks owned by one entity.
///
/// The chain is parameterized by its difficulty prefix; every sealed hash
/// must carry it. Chains never shrink: logical deletion of the owning
/// entity is recorded as a tombstone block while the history is retained.
#[derive(Debug, Clone)]
pub struct Chain {
    chain_id: ChainId,
    difficulty_prefix: String,
    max_mining_iterations: u64,
    blocks: Vec<Block>,
}

impl Chain {
    /// Create an empty chain for `chain_id`.
    pub fn new(chain_id: ChainId, config: &LedgerConfig) -> Self {
        Self {
            chain_id,
            difficulty_prefix: config.difficulty_prefix.clone(),
            max_mining_iterations: config.max_mining_iterations,
            blocks: Vec::new(),
        }
    }

    /// Rehydrate a chain from blocks loaded out of the store.
    pub fn from_blocks(chain_id: ChainId, config: &LedgerConfig, blocks: Vec<Block>) -> Self {
        Self {
            chain_id,
            difficulty_prefix: config.difficulty_prefix.clone(),
            max_mining_iterations: config.max_mining_iterations,
            blocks,
        }
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn difficulty_prefix(&self) -> &str {
        &self.difficulty_prefix
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The current tip, if any.
    pub fn latest(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Mine and append a new block.
    ///
    /// `prev_override` pins the predecessor hash explicitly (used for
    /// genesis blocks, whose `prev_hash` is the sentinel or a parent-chain
    /// hash); otherwise the current tip's hash is used, or the sentinel on
    /// an empty chain.
    pub fn append(
        &mut self,
        transactions: Vec<Transaction>,
        prev_override: Option<String>,
        timestamp: String,
    ) -> ChainResult<&Block> {
        let index = self.blocks.len() as u64;
        let prev_hash = match prev_override {
            Some(hash) => hash,
            None => self
                .latest()
                .map(|b| b.hash.clone())
                .unwrap_or_else(|| GENESIS_SENTINEL.to_string()),
        };

        let mut block = Block::new(index, transactions, timestamp, prev_hash)?;
        block.mine(&self.difficulty_prefix, self.max_mining_iterations)?;
        self.blocks.push(block);
        Ok(self.blocks.last().unwrap_or_else(|| unreachable!()))
    }

    /// Validate the chain's internal integrity.
    ///
    /// `expected_genesis_prev` is the root value block 0 must link to: the
    /// sentinel for departments, or the genesis reference captured from the
    /// parent chain for classes and students.
    pub fn validate(&self, expected_genesis_prev: &str) -> ChainResult<()> {
        validate_blocks(&self.blocks, &self.difficulty_prefix, expected_genesis_prev)
    }
}

/// Validate a loaded block sequence without rebuilding a [`Chain`].
///
/// Checks, per block and in order: index continuity, digest recomputation,
/// difficulty prefix, and `prev_hash` linkage (block 0 against
/// `expected_genesis_prev`). Returns the first violation. An empty slice is
/// vacuously valid; callers that require a non-empty chain report that
/// themselves.
pub fn validate_blocks(
    blocks: &[Block],
    difficulty_prefix: &str,
    expected_genesis_prev: &str,
) -> ChainResult<()> {
    for (i, block) in blocks.iter().enumerate() {
        let index = i as u64;

        if block.index != index {
            return Err(ChainError::LinkBroken { index });
        }
        if block.compute_hash()? != block.hash {
            return Err(ChainError::HashMismatch { index });
        }
        if !block.satisfies_difficulty(difficulty_prefix) {
            return Err(ChainError::ProofOfWorkFailed {
                index,
                prefix: difficulty_prefix.to_string(),
            });
        }
        if i == 0 {
            if block.prev_hash != expected_genesis_prev {
                return Err(ChainError::LinkBroken { index: 0 });
            }
        } else if block.prev_hash != blocks[i - 1].hash {
            return Err(ChainError::LinkBroken { index });
        }
    }
    Ok(())
}
