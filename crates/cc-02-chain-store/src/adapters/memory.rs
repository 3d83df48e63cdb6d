//! In-memory [`ChainStore`] adapter.
//!
//! Backs tests and single-process deployments. The write lock is held only
//! for the compare-and-push itself; mining happens entirely outside the
//! store, so contention stays bounded by map operations.

use crate::ports::{ChainStore, EntityPatch, StoreError};
use async_trait::async_trait;
use cc_01_chain::Block;
use parking_lot::RwLock;
use shared_types::{ChainId, EntityRecord, Tier};
use std::collections::HashMap;

struct StoredEntity {
    record: EntityRecord,
    blocks: Vec<Block>,
}

/// Thread-safe in-memory store keyed by entity id.
#[derive(Default)]
pub struct InMemoryChainStore {
    inner: RwLock<HashMap<String, StoredEntity>>,
}

impl InMemoryChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a stored chain wholesale. Test hook for corruption
    /// scenarios; not part of the [`ChainStore`] contract.
    pub fn replace_chain_unchecked(&self, chain_id: &ChainId, blocks: Vec<Block>) {
        let mut inner = self.inner.write();
        if let Some(entity_id) = ChainId::parse(chain_id.as_str()).map(|(_, id)| id.to_string()) {
            if let Some(stored) = inner.get_mut(&entity_id) {
                stored.blocks = blocks;
            }
        }
    }

    fn entity_id_of(chain_id: &ChainId) -> Result<String, StoreError> {
        ChainId::parse(chain_id.as_str())
            .map(|(_, id)| id.to_string())
            .ok_or_else(|| StoreError::ChainNotFound(chain_id.clone()))
    }
}

#[async_trait]
impl ChainStore for InMemoryChainStore {
    async fn create_chain(&self, record: EntityRecord, genesis: Block) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.contains_key(&record.entity_id) {
            return Err(StoreError::ChainExists(record.chain_id()));
        }
        inner.insert(
            record.entity_id.clone(),
            StoredEntity {
                record,
                blocks: vec![genesis],
            },
        );
        Ok(())
    }

    async fn latest_block(&self, chain_id: &ChainId) -> Result<Option<Block>, StoreError> {
        let entity_id = Self::entity_id_of(chain_id)?;
        let inner = self.inner.read();
        Ok(inner
            .get(&entity_id)
            .and_then(|stored| stored.blocks.last().cloned()))
    }

    async fn load_chain(&self, chain_id: &ChainId) -> Result<Option<Vec<Block>>, StoreError> {
        let entity_id = Self::entity_id_of(chain_id)?;
        let inner = self.inner.read();
        Ok(inner.get(&entity_id).map(|stored| stored.blocks.clone()))
    }

    async fn append_block(
        &self,
        chain_id: &ChainId,
        expected_tip: &str,
        block: Block,
    ) -> Result<(), StoreError> {
        let entity_id = Self::entity_id_of(chain_id)?;
        let mut inner = self.inner.write();
        let stored = inner
            .get_mut(&entity_id)
            .ok_or_else(|| StoreError::ChainNotFound(chain_id.clone()))?;
        let tip = stored
            .blocks
            .last()
            .ok_or_else(|| StoreError::ChainNotFound(chain_id.clone()))?;

        if tip.hash != expected_tip {
            tracing::debug!(chain_id = %chain_id, "conditional append lost the tip race");
            return Err(StoreError::Conflict {
                chain_id: chain_id.clone(),
                expected: expected_tip.to_string(),
                actual: tip.hash.clone(),
            });
        }
        // Commit-time invariant guards: candidate must extend exactly the
        // tip it claims to. Violations are caller bugs, not races.
        if block.prev_hash != tip.hash {
            return Err(StoreError::RejectedAppend {
                chain_id: chain_id.clone(),
                reason: "prev_hash does not match the current tip".to_string(),
            });
        }
        if block.index != stored.blocks.len() as u64 {
            return Err(StoreError::RejectedAppend {
                chain_id: chain_id.clone(),
                reason: format!(
                    "index {} does not continue the chain at length {}",
                    block.index,
                    stored.blocks.len()
                ),
            });
        }

        stored.blocks.push(block);
        Ok(())
    }

    async fn entity(&self, entity_id: &str) -> Result<Option<EntityRecord>, StoreError> {
        let inner = self.inner.read();
        Ok(inner.get(entity_id).map(|stored| stored.record.clone()))
    }

    async fn list_entities(
        &self,
        tier: Tier,
        parent_id: Option<&str>,
    ) -> Result<Vec<EntityRecord>, StoreError> {
        let inner = self.inner.read();
        let mut records: Vec<EntityRecord> = inner
            .values()
            .filter(|stored| stored.record.tier == tier)
            .filter(|stored| match parent_id {
                Some(parent) => stored.record.parent_id.as_deref() == Some(parent),
                None => true,
            })
            .map(|stored| stored.record.clone())
            .collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.entity_id.cmp(&b.entity_id))
        });
        Ok(records)
    }

    async fn update_entity(&self, entity_id: &str, patch: EntityPatch) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let stored = inner
            .get_mut(entity_id)
            .ok_or_else(|| StoreError::EntityNotFound(entity_id.to_string()))?;
        if let Some(name) = patch.name {
            stored.record.name = name;
        }
        if let Some(roll_no) = patch.roll_no {
            stored.record.roll_no = Some(roll_no);
        }
        if let Some(status) = patch.status {
            stored.record.status = status;
        }
        Ok(())
    }
}
