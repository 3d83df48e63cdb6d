//! # cc-03-validator
//!
//! Recursive forest validator for Campus-Chain.
//!
//! ## Architecture
//!
//! The validator reads the whole forest through the [`ChainStore`] port and
//! audits it best-effort: every node is visited and reported on, even when
//! its own chain or an ancestor already failed, so one corrupted chain
//! never hides the state of the rest of the forest. It mutates nothing and
//! may run concurrently with ongoing appends; each chain is checked against
//! the point-in-time snapshot the store returned for it.
//!
//! ## Cross-tier linkage
//!
//! A child genesis `prev_hash` is valid if it is a member of the set of all
//! hashes its parent chain has ever produced -- historical membership, not
//! latest-only. Parents keep growing after children are created; requiring
//! the latest hash would make concurrent sibling creation and parent
//! updates mutually exclusive.
//!
//! [`ChainStore`]: cc_02_chain_store::ChainStore

pub mod report;
pub mod validator;

pub use report::{ClassReport, DepartmentReport, ReportSummary, StudentReport, ValidationReport};
pub use validator::ForestValidator;
