//! # cc-04-hierarchy
//!
//! Application service for the Campus-Chain forest.
//!
//! ## Architecture
//!
//! The chain core (cc-01) enforces ledger integrity; this crate owns the
//! entity lifecycle around it: minting ids, capturing parent hashes at
//! creation time, tombstone deletes with the active-children guard,
//! attendance marking, and the bounded retry loop that absorbs
//! concurrent-writer conflicts from the store's conditional append.
//!
//! Lifecycle rules ("no delete while active children exist", "deletes are
//! tombstones, never truncation") live here by design -- the ledger core
//! records history, the application layer decides what may happen next.

pub mod error;
pub mod service;
pub mod stats;
pub mod tree;

pub use error::{HierarchyError, HierarchyResult};
pub use service::{
    ClassSummary, DepartmentSummary, HierarchyService, StudentSummary,
};
pub use stats::{AttendanceStats, BlockchainStats, EntityCounts, SystemStats};
pub use tree::HierarchyNode;
