//! Hierarchy Service - entity lifecycle over the ledger forest.
//!
//! Every mutating operation follows the same shape: read the tip, mine a
//! candidate block outside any lock, then commit through the store's
//! conditional append. Conflicts are retried with a fresh tip up to
//! `LedgerConfig::max_append_retries` before surfacing `AppendConflict`.

use crate::error::{HierarchyError, HierarchyResult};
use crate::stats::{AttendanceStats, BlockchainStats, EntityCounts, SystemStats};
use crate::tree::HierarchyNode;
use cc_01_chain::{Block, Chain, ChainError, GenesisPolicy};
use cc_02_chain_store::{ChainStore, EntityPatch, StoreError, SystemTimeSource, TimeSource};
use serde::{Deserialize, Serialize};
use shared_types::{
    AttendanceStatus, ChainId, ClassMeta, DepartmentMeta, EntityHandle, EntityRecord,
    EntityStatus, LedgerConfig, NameUpdate, StudentMeta, StudentUpdate, Tier, Transaction,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Active-department listing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub id: String,
    pub chain_id: String,
    pub name: String,
    pub created_at: String,
    pub class_count: usize,
}

/// Active-class listing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub id: String,
    pub chain_id: String,
    pub name: String,
    pub parent_dept_id: String,
    pub created_at: String,
    pub student_count: usize,
}

/// Active-student listing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: String,
    pub chain_id: String,
    pub name: String,
    pub roll_no: String,
    pub parent_class_id: String,
    pub created_at: String,
}

/// Application service over the three-tier forest.
pub struct HierarchyService<S> {
    store: Arc<S>,
    config: LedgerConfig,
    time_source: Box<dyn TimeSource>,
}

impl<S: ChainStore> HierarchyService<S> {
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self {
            store,
            config,
            time_source: Box::new(SystemTimeSource),
        }
    }

    /// Set custom time source (for testing).
    pub fn with_time_source(mut self, time_source: Box<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    // === ENTITY CREATION ===

    /// Create a department with a sentinel-linked genesis chain.
    pub async fn create_department(&self, name: &str) -> HierarchyResult<EntityHandle> {
        let id = Uuid::new_v4().to_string();
        let policy = GenesisPolicy::Department {
            meta: DepartmentMeta {
                id: id.clone(),
                name: name.to_string(),
            },
        };
        self.create_entity(Tier::Department, id, None, name, None, policy)
            .await
    }

    /// Create a class whose genesis references the parent department's
    /// current tip.
    pub async fn create_class(
        &self,
        name: &str,
        parent_dept_id: &str,
    ) -> HierarchyResult<EntityHandle> {
        let parent_hash = self
            .parent_tip(Tier::Department, parent_dept_id)
            .await?;
        let id = Uuid::new_v4().to_string();
        let policy = GenesisPolicy::Class {
            meta: ClassMeta {
                id: id.clone(),
                parent_dept_id: parent_dept_id.to_string(),
                name: name.to_string(),
            },
            parent_hash,
        };
        self.create_entity(
            Tier::Class,
            id,
            Some(parent_dept_id.to_string()),
            name,
            None,
            policy,
        )
        .await
    }

    /// Create a student whose genesis references the parent class's
    /// current tip.
    pub async fn create_student(
        &self,
        name: &str,
        roll_no: &str,
        parent_class_id: &str,
    ) -> HierarchyResult<EntityHandle> {
        let parent_hash = self.parent_tip(Tier::Class, parent_class_id).await?;
        let id = Uuid::new_v4().to_string();
        let policy = GenesisPolicy::Student {
            meta: StudentMeta {
                id: id.clone(),
                parent_class_id: parent_class_id.to_string(),
                name: name.to_string(),
                roll_no: roll_no.to_string(),
            },
            parent_hash,
        };
        self.create_entity(
            Tier::Student,
            id,
            Some(parent_class_id.to_string()),
            name,
            Some(roll_no.to_string()),
            policy,
        )
        .await
    }

    // === UPDATES ===

    pub async fn update_department(&self, id: &str, name: &str) -> HierarchyResult<()> {
        let record = self.require_entity(id, Tier::Department).await?;
        let tx = Transaction::DepartmentUpdate {
            update: NameUpdate {
                name: name.to_string(),
            },
        };
        self.append_with_retry(&record.chain_id(), vec![tx]).await?;
        self.store
            .update_entity(id, EntityPatch::rename(name))
            .await?;
        Ok(())
    }

    pub async fn update_class(&self, id: &str, name: &str) -> HierarchyResult<()> {
        let record = self.require_entity(id, Tier::Class).await?;
        let tx = Transaction::ClassUpdate {
            update: NameUpdate {
                name: name.to_string(),
            },
        };
        self.append_with_retry(&record.chain_id(), vec![tx]).await?;
        self.store
            .update_entity(id, EntityPatch::rename(name))
            .await?;
        Ok(())
    }

    pub async fn update_student(&self, id: &str, update: StudentUpdate) -> HierarchyResult<()> {
        let record = self.require_entity(id, Tier::Student).await?;
        let patch = EntityPatch {
            name: update.name.clone(),
            roll_no: update.roll_no.clone(),
            status: None,
        };
        let tx = Transaction::StudentUpdate { update };
        self.append_with_retry(&record.chain_id(), vec![tx]).await?;
        self.store.update_entity(id, patch).await?;
        Ok(())
    }

    // === LOGICAL DELETES ===

    /// Tombstone a department. Refused while it has active classes.
    pub async fn delete_department(&self, id: &str) -> HierarchyResult<()> {
        let record = self.require_entity(id, Tier::Department).await?;
        self.guard_no_active_children(Tier::Department, id, Tier::Class)
            .await?;
        self.tombstone(&record, Transaction::DepartmentDelete).await
    }

    /// Tombstone a class. Refused while it has active students.
    pub async fn delete_class(&self, id: &str) -> HierarchyResult<()> {
        let record = self.require_entity(id, Tier::Class).await?;
        self.guard_no_active_children(Tier::Class, id, Tier::Student)
            .await?;
        self.tombstone(&record, Transaction::ClassDelete).await
    }

    /// Tombstone a student. Students have no children to guard.
    pub async fn delete_student(&self, id: &str) -> HierarchyResult<()> {
        let record = self.require_entity(id, Tier::Student).await?;
        self.tombstone(&record, Transaction::StudentDelete).await
    }

    // === DOMAIN EVENTS ===

    /// Record an attendance mark on the student's chain.
    pub async fn mark_attendance(
        &self,
        student_id: &str,
        status: AttendanceStatus,
        date: Option<String>,
        notes: Option<String>,
    ) -> HierarchyResult<Block> {
        let record = self.require_entity(student_id, Tier::Student).await?;
        let class_id = record
            .parent_id
            .clone()
            .ok_or_else(|| HierarchyError::MissingParent(student_id.to_string()))?;

        let tx = Transaction::AttendanceMark {
            student_id: student_id.to_string(),
            class_id,
            status,
            date,
            notes,
        };
        self.append_with_retry(&record.chain_id(), vec![tx]).await
    }

    // === QUERIES ===

    /// Active departments with their active-class counts.
    pub async fn list_departments(&self) -> HierarchyResult<Vec<DepartmentSummary>> {
        let mut rows = Vec::new();
        for record in self.active(Tier::Department, None).await? {
            let class_count = self.active(Tier::Class, Some(&record.entity_id)).await?.len();
            rows.push(DepartmentSummary {
                id: record.entity_id.clone(),
                chain_id: record.chain_id().to_string(),
                name: record.name,
                created_at: record.created_at,
                class_count,
            });
        }
        Ok(rows)
    }

    /// Active classes, optionally restricted to one department.
    pub async fn list_classes(
        &self,
        parent_dept_id: Option<&str>,
    ) -> HierarchyResult<Vec<ClassSummary>> {
        let mut rows = Vec::new();
        for record in self.active(Tier::Class, parent_dept_id).await? {
            let student_count = self
                .active(Tier::Student, Some(&record.entity_id))
                .await?
                .len();
            rows.push(ClassSummary {
                id: record.entity_id.clone(),
                chain_id: record.chain_id().to_string(),
                name: record.name.clone(),
                parent_dept_id: record
                    .parent_id
                    .clone()
                    .ok_or_else(|| HierarchyError::MissingParent(record.entity_id.clone()))?,
                created_at: record.created_at,
                student_count,
            });
        }
        Ok(rows)
    }

    /// Active students, optionally restricted to one class.
    pub async fn list_students(
        &self,
        parent_class_id: Option<&str>,
    ) -> HierarchyResult<Vec<StudentSummary>> {
        let records = self.active(Tier::Student, parent_class_id).await?;
        records.into_iter().map(student_summary).collect()
    }

    /// Case-insensitive substring search over active students' names and
    /// roll numbers.
    pub async fn find_students(&self, query: &str) -> HierarchyResult<Vec<StudentSummary>> {
        let needle = query.to_lowercase();
        let records = self.active(Tier::Student, None).await?;
        records
            .into_iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.roll_no
                        .as_deref()
                        .is_some_and(|roll| roll.to_lowercase().contains(&needle))
            })
            .map(student_summary)
            .collect()
    }

    /// Load a full chain by raw chain id (`dept-...`, `class-...`,
    /// `student-...`). Malformed ids resolve to `None`, not an error.
    pub async fn get_chain(&self, raw_chain_id: &str) -> HierarchyResult<Option<Vec<Block>>> {
        if ChainId::parse(raw_chain_id).is_none() {
            return Ok(None);
        }
        Ok(self.store.load_chain(&ChainId::from(raw_chain_id)).await?)
    }

    /// The active forest as a nested tree for explorer UIs.
    pub async fn hierarchy_tree(&self) -> HierarchyResult<Vec<HierarchyNode>> {
        let mut tree = Vec::new();
        for dept in self.active(Tier::Department, None).await? {
            let mut dept_node = HierarchyNode::branch(&dept);
            for class in self.active(Tier::Class, Some(&dept.entity_id)).await? {
                let mut class_node = HierarchyNode::branch(&class);
                for student in self.active(Tier::Student, Some(&class.entity_id)).await? {
                    class_node.children.push(HierarchyNode::leaf(&student));
                }
                dept_node.children.push(class_node);
            }
            tree.push(dept_node);
        }
        Ok(tree)
    }

    /// Aggregate counters over entities, chains, and attendance records.
    pub async fn system_stats(&self) -> HierarchyResult<SystemStats> {
        let entities = EntityCounts {
            departments: self.active(Tier::Department, None).await?.len(),
            classes: self.active(Tier::Class, None).await?.len(),
            students: self.active(Tier::Student, None).await?.len(),
        };

        let mut total_blocks: u64 = 0;
        let mut chain_count: u64 = 0;
        let mut tier_chains = [0usize; 3];
        let mut attendance = AttendanceStats::default();

        for (slot, tier) in [Tier::Department, Tier::Class, Tier::Student]
            .into_iter()
            .enumerate()
        {
            for record in self.store.list_entities(tier, None).await? {
                tier_chains[slot] += 1;
                let blocks = self
                    .store
                    .load_chain(&record.chain_id())
                    .await?
                    .unwrap_or_default();
                if blocks.is_empty() {
                    continue;
                }
                total_blocks += blocks.len() as u64;
                chain_count += 1;
                if tier == Tier::Student {
                    tally_attendance(&blocks, &mut attendance);
                }
            }
        }
        attendance.finalize_percentages();

        let avg_chain_length = if chain_count > 0 {
            total_blocks as f64 / chain_count as f64
        } else {
            0.0
        };

        Ok(SystemStats {
            entities,
            blockchain: BlockchainStats {
                total_blocks,
                department_chains: tier_chains[0],
                class_chains: tier_chains[1],
                student_chains: tier_chains[2],
                avg_chain_length,
                difficulty: self.config.difficulty_prefix.clone(),
            },
            attendance,
        })
    }

    // === INTERNALS ===

    /// Read the parent chain's tip hash, failing `ChainNotFound` when the
    /// parent chain is absent or empty.
    async fn parent_tip(&self, tier: Tier, parent_id: &str) -> HierarchyResult<String> {
        let chain_id = ChainId::new(tier, parent_id);
        let tip = self
            .store
            .latest_block(&chain_id)
            .await?
            .ok_or(ChainError::ChainNotFound(chain_id))?;
        Ok(tip.hash)
    }

    async fn create_entity(
        &self,
        tier: Tier,
        id: String,
        parent_id: Option<String>,
        name: &str,
        roll_no: Option<String>,
        policy: GenesisPolicy,
    ) -> HierarchyResult<EntityHandle> {
        let chain_id = ChainId::new(tier, &id);
        let mut chain = Chain::new(chain_id.clone(), &self.config);
        let genesis = chain
            .create_genesis(&policy, self.time_source.now_iso())?
            .clone();

        let record = EntityRecord {
            entity_id: id.clone(),
            tier,
            parent_id,
            name: name.to_string(),
            roll_no,
            status: EntityStatus::Active,
            created_at: genesis.timestamp.clone(),
        };
        self.store.create_chain(record, genesis).await?;

        info!(%chain_id, %tier, "entity created with genesis chain");
        Ok(EntityHandle { id, chain_id })
    }

    async fn require_entity(&self, id: &str, tier: Tier) -> HierarchyResult<EntityRecord> {
        match self.store.entity(id).await? {
            Some(record) if record.tier == tier => Ok(record),
            _ => Err(HierarchyError::EntityNotFound(id.to_string())),
        }
    }

    async fn active(
        &self,
        tier: Tier,
        parent_id: Option<&str>,
    ) -> HierarchyResult<Vec<EntityRecord>> {
        let records = self.store.list_entities(tier, parent_id).await?;
        Ok(records.into_iter().filter(EntityRecord::is_active).collect())
    }

    async fn guard_no_active_children(
        &self,
        tier: Tier,
        id: &str,
        child_tier: Tier,
    ) -> HierarchyResult<()> {
        let count = self.active(child_tier, Some(id)).await?.len();
        if count > 0 {
            return Err(HierarchyError::ActiveChildren {
                tier,
                id: id.to_string(),
                count,
                child_tier,
            });
        }
        Ok(())
    }

    async fn tombstone(
        &self,
        record: &EntityRecord,
        tx: Transaction,
    ) -> HierarchyResult<()> {
        self.append_with_retry(&record.chain_id(), vec![tx]).await?;
        self.store
            .update_entity(&record.entity_id, EntityPatch::status(EntityStatus::Deleted))
            .await?;
        info!(chain_id = %record.chain_id(), "entity tombstoned; chain retained");
        Ok(())
    }

    /// Read-latest, mine unlocked, then conditionally append.
    ///
    /// On a conflict the tip is re-read and the block re-mined against the
    /// new predecessor, up to `max_append_retries` attempts; after that the
    /// conflict surfaces as `ChainError::AppendConflict`.
    async fn append_with_retry(
        &self,
        chain_id: &ChainId,
        transactions: Vec<Transaction>,
    ) -> HierarchyResult<Block> {
        let mut attempt: u32 = 0;
        loop {
            let tip = self
                .store
                .latest_block(chain_id)
                .await?
                .ok_or_else(|| ChainError::ChainNotFound(chain_id.clone()))?;

            let mut block = Block::new(
                tip.index + 1,
                transactions.clone(),
                self.time_source.now_iso(),
                tip.hash.clone(),
            )?;
            block.mine(&self.config.difficulty_prefix, self.config.max_mining_iterations)?;

            match self
                .store
                .append_block(chain_id, &tip.hash, block.clone())
                .await
            {
                Ok(()) => return Ok(block),
                Err(StoreError::Conflict { .. }) if attempt < self.config.max_append_retries => {
                    attempt += 1;
                    warn!(%chain_id, attempt, "append conflict; re-reading tip and retrying");
                }
                Err(StoreError::Conflict { .. }) => {
                    return Err(ChainError::AppendConflict(chain_id.clone()).into());
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn student_summary(record: EntityRecord) -> HierarchyResult<StudentSummary> {
    let parent_class_id = record
        .parent_id
        .clone()
        .ok_or_else(|| HierarchyError::MissingParent(record.entity_id.clone()))?;
    Ok(StudentSummary {
        id: record.entity_id.clone(),
        chain_id: record.chain_id().to_string(),
        name: record.name,
        roll_no: record.roll_no.unwrap_or_default(),
        parent_class_id,
        created_at: record.created_at,
    })
}

fn tally_attendance(blocks: &[Block], stats: &mut AttendanceStats) {
    for block in blocks {
        for tx in &block.transactions {
            if let Transaction::AttendanceMark { status, .. } = tx {
                stats.total_records += 1;
                match status {
                    AttendanceStatus::Present => stats.present += 1,
                    AttendanceStatus::Absent => stats.absent += 1,
                    AttendanceStatus::Leave => stats.leave += 1,
                }
            }
        }
    }
}
