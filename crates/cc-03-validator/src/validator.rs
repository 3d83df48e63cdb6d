//! The recursive forest walk.

use crate::report::{
    ClassReport, DepartmentReport, ReportSummary, StudentReport, ValidationReport,
};
use cc_01_chain::{validate_blocks, Block, ChainError};
use cc_02_chain_store::{ChainStore, StoreError};
use shared_types::{ChainId, EntityRecord, LedgerConfig, Tier, GENESIS_SENTINEL};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Audits the whole forest through the store port.
///
/// Read-only and best-effort: per-node failures are recorded in the report,
/// never raised, so the audit always covers every known entity.
pub struct ForestValidator<S> {
    store: Arc<S>,
    config: LedgerConfig,
}

impl<S: ChainStore> ForestValidator<S> {
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Walk every department chain, its classes, and their students.
    ///
    /// Only store-level failures abort the audit; integrity violations are
    /// reported per node.
    pub async fn validate_forest(&self) -> Result<ValidationReport, StoreError> {
        let mut invalid: u64 = 0;
        let mut departments = Vec::new();

        for dept in self.store.list_entities(Tier::Department, None).await? {
            departments.push(self.audit_department(&dept, &mut invalid).await?);
        }

        let report = ValidationReport {
            valid: invalid == 0,
            departments,
            summary: ReportSummary {
                total_invalid: invalid,
            },
        };
        info!(
            departments = report.departments.len(),
            total_invalid = invalid,
            "forest audit complete"
        );
        Ok(report)
    }

    async fn audit_department(
        &self,
        dept: &EntityRecord,
        invalid: &mut u64,
    ) -> Result<DepartmentReport, StoreError> {
        let chain_id = dept.chain_id();
        let blocks = self.load(&chain_id).await?;
        let outcome = self.check_root(&chain_id, &blocks);
        let hashes = hash_set(&blocks);

        let mut classes = Vec::new();
        for class in self
            .store
            .list_entities(Tier::Class, Some(&dept.entity_id))
            .await?
        {
            classes.push(self.audit_class(&class, &hashes, invalid).await?);
        }

        let (valid, reason) = settle(&chain_id, outcome, invalid);
        Ok(DepartmentReport {
            id: dept.entity_id.clone(),
            chain_id: chain_id.to_string(),
            valid,
            reason,
            classes,
        })
    }

    async fn audit_class(
        &self,
        class: &EntityRecord,
        dept_hashes: &HashSet<String>,
        invalid: &mut u64,
    ) -> Result<ClassReport, StoreError> {
        let chain_id = class.chain_id();
        let blocks = self.load(&chain_id).await?;
        let outcome = self.check_child(&chain_id, &blocks, dept_hashes);
        let hashes = hash_set(&blocks);

        // Students are audited even when this class already failed: a
        // parent failure must not hide the state of the subtree.
        let mut students = Vec::new();
        for student in self
            .store
            .list_entities(Tier::Student, Some(&class.entity_id))
            .await?
        {
            students.push(self.audit_student(&student, &hashes, invalid).await?);
        }

        let (valid, reason) = settle(&chain_id, outcome, invalid);
        Ok(ClassReport {
            id: class.entity_id.clone(),
            chain_id: chain_id.to_string(),
            valid,
            reason,
            students,
        })
    }

    async fn audit_student(
        &self,
        student: &EntityRecord,
        class_hashes: &HashSet<String>,
        invalid: &mut u64,
    ) -> Result<StudentReport, StoreError> {
        let chain_id = student.chain_id();
        let blocks = self.load(&chain_id).await?;
        let outcome = self.check_child(&chain_id, &blocks, class_hashes);

        let (valid, reason) = settle(&chain_id, outcome, invalid);
        Ok(StudentReport {
            id: student.entity_id.clone(),
            chain_id: chain_id.to_string(),
            valid,
            reason,
        })
    }

    async fn load(&self, chain_id: &ChainId) -> Result<Vec<Block>, StoreError> {
        Ok(self.store.load_chain(chain_id).await?.unwrap_or_default())
    }

    /// Root chains link block 0 to the sentinel.
    fn check_root(&self, chain_id: &ChainId, blocks: &[Block]) -> Result<(), ChainError> {
        if blocks.is_empty() {
            return Err(ChainError::ChainNotFound(chain_id.clone()));
        }
        validate_blocks(blocks, &self.config.difficulty_prefix, GENESIS_SENTINEL)
    }

    /// Child chains link block 0 into the parent's hash set.
    ///
    /// Historical membership: any hash the parent ever produced qualifies,
    /// not only the current tip. When the membership check passes, the
    /// chain is validated internally with its own genesis `prev_hash` as
    /// the expected root.
    fn check_child(
        &self,
        chain_id: &ChainId,
        blocks: &[Block],
        parent_hashes: &HashSet<String>,
    ) -> Result<(), ChainError> {
        if blocks.is_empty() {
            return Err(ChainError::ChainNotFound(chain_id.clone()));
        }
        let genesis_prev = blocks[0].prev_hash.as_str();
        if !parent_hashes.contains(genesis_prev) {
            return Err(ChainError::GenesisLinkBroken);
        }
        validate_blocks(blocks, &self.config.difficulty_prefix, genesis_prev)
    }
}

fn hash_set(blocks: &[Block]) -> HashSet<String> {
    blocks.iter().map(|b| b.hash.clone()).collect()
}

/// Fold a node outcome into `(valid, reason)` and the invalid counter.
fn settle(
    chain_id: &ChainId,
    outcome: Result<(), ChainError>,
    invalid: &mut u64,
) -> (bool, Option<String>) {
    match outcome {
        Ok(()) => (true, None),
        Err(err) => {
            warn!(chain_id = %chain_id, %err, "chain failed audit");
            *invalid += 1;
            (false, Some(err.to_string()))
        }
    }
}
