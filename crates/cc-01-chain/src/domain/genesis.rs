//! Per-tier genesis policies.
//!
//! The three tiers differ only in their genesis payload and where the
//! genesis `prev_hash` comes from, so one generic [`Chain`] is configured
//! with a tier-specific policy value instead of a type per tier.

use super::chain::Chain;
use super::error::{ChainError, ChainResult};
use shared_types::{
    ClassMeta, DepartmentMeta, StudentMeta, Tier, Transaction, GENESIS_SENTINEL,
};

/// Strategy producing a chain's one-time genesis block.
///
/// For classes and students the parent hash is captured by the caller at
/// entity-creation time, typically the parent chain's tip at that moment.
/// Validation later accepts any hash the parent chain has ever produced
/// (historical membership), so concurrent sibling creation under one parent
/// stays possible.
#[derive(Debug, Clone, PartialEq)]
pub enum GenesisPolicy {
    Department {
        meta: DepartmentMeta,
    },
    Class {
        meta: ClassMeta,
        parent_hash: String,
    },
    Student {
        meta: StudentMeta,
        parent_hash: String,
    },
}

impl GenesisPolicy {
    /// The tier this policy creates chains for.
    pub fn tier(&self) -> Tier {
        match self {
            GenesisPolicy::Department { .. } => Tier::Department,
            GenesisPolicy::Class { .. } => Tier::Class,
            GenesisPolicy::Student { .. } => Tier::Student,
        }
    }

    /// The `prev_hash` the genesis block is pinned to.
    pub fn parent_hash(&self) -> &str {
        match self {
            GenesisPolicy::Department { .. } => GENESIS_SENTINEL,
            GenesisPolicy::Class { parent_hash, .. } => parent_hash,
            GenesisPolicy::Student { parent_hash, .. } => parent_hash,
        }
    }

    /// The tagged genesis record for the block payload.
    pub fn transaction(&self) -> Transaction {
        match self {
            GenesisPolicy::Department { meta } => Transaction::DepartmentGenesis {
                meta: meta.clone(),
            },
            GenesisPolicy::Class { meta, .. } => Transaction::ClassGenesis { meta: meta.clone() },
            GenesisPolicy::Student { meta, .. } => {
                Transaction::StudentGenesis { meta: meta.clone() }
            }
        }
    }
}

impl Chain {
    /// Mine and append the chain's genesis block.
    ///
    /// One-time per chain: fails with [`ChainError::GenesisAlreadyExists`]
    /// if any block is already present.
    pub fn create_genesis(
        &mut self,
        policy: &GenesisPolicy,
        timestamp: String,
    ) -> ChainResult<&super::block::Block> {
        if !self.is_empty() {
            return Err(ChainError::GenesisAlreadyExists(self.chain_id().clone()));
        }
        self.append(
            vec![policy.transaction()],
            Some(policy.parent_hash().to_string()),
            timestamp,
        )
    }
}
