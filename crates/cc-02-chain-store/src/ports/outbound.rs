//! # Outbound Ports (Driven Ports)
//!
//! Interfaces the ledger requires the host to implement.

use async_trait::async_trait;
use cc_01_chain::Block;
use chrono::{SecondsFormat, Utc};
use shared_types::{ChainId, EntityRecord, EntityStatus, Tier};
use thiserror::Error;

/// Errors raised by the storage contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `create_chain` targeted an entity id that already has a chain.
    #[error("Chain already exists: {0}")]
    ChainExists(ChainId),

    /// A read or append targeted a chain with no stored blocks.
    #[error("Chain not found: {0}")]
    ChainNotFound(ChainId),

    /// No entity record under this id.
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Conditional append lost the race: the stored tip no longer matches
    /// what the writer read. Recoverable by re-reading and retrying.
    #[error("Append conflict on chain {chain_id}: expected tip {expected}, found {actual}")]
    Conflict {
        chain_id: ChainId,
        expected: String,
        actual: String,
    },

    /// Candidate block violates the append invariants (index or linkage).
    /// Indicates a caller bug, not a race; never retried.
    #[error("Rejected append on chain {chain_id}: {reason}")]
    RejectedAppend { chain_id: ChainId, reason: String },

    /// Backend failure (I/O, corruption, ...).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Partial update of an entity record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPatch {
    pub name: Option<String>,
    pub roll_no: Option<String>,
    pub status: Option<EntityStatus>,
}

impl EntityPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn status(status: EntityStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Abstract interface for chain and entity persistence.
///
/// Reads are point-in-time snapshots per chain; no global linearizable
/// snapshot across chains is promised (or needed by the validator).
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Persist a new entity record together with its sealed genesis block.
    ///
    /// One-shot: fails with [`StoreError::ChainExists`] if the entity
    /// already has a chain.
    async fn create_chain(&self, record: EntityRecord, genesis: Block) -> Result<(), StoreError>;

    /// Read the current tip of a chain, `None` if absent or empty.
    async fn latest_block(&self, chain_id: &ChainId) -> Result<Option<Block>, StoreError>;

    /// Read a full chain, `None` if absent.
    async fn load_chain(&self, chain_id: &ChainId) -> Result<Option<Vec<Block>>, StoreError>;

    /// Conditionally append a sealed block.
    ///
    /// Commits only if the stored tip hash still equals `expected_tip`;
    /// otherwise returns [`StoreError::Conflict`] and stores nothing. A
    /// block is appended whole or not at all.
    async fn append_block(
        &self,
        chain_id: &ChainId,
        expected_tip: &str,
        block: Block,
    ) -> Result<(), StoreError>;

    /// Read one entity record.
    async fn entity(&self, entity_id: &str) -> Result<Option<EntityRecord>, StoreError>;

    /// List entity records of a tier, optionally restricted to one parent.
    ///
    /// Returns records of every lifecycle status; callers filter. Ordering
    /// is stable (creation time, then id).
    async fn list_entities(
        &self,
        tier: Tier,
        parent_id: Option<&str>,
    ) -> Result<Vec<EntityRecord>, StoreError>;

    /// Apply a partial update to an entity record.
    async fn update_entity(&self, entity_id: &str, patch: EntityPatch) -> Result<(), StoreError>;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current instant as an ISO-8601 UTC string with millisecond
    /// precision, e.g. `2024-03-01T08:00:00.000Z`.
    fn now_iso(&self) -> String;
}

/// Wall-clock time source used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_iso(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
