//! Error types for the hierarchy service.

use cc_01_chain::ChainError;
use cc_02_chain_store::StoreError;
use shared_types::Tier;
use thiserror::Error;

/// Errors raised by hierarchy operations.
///
/// Chain and store errors pass through unchanged; the service adds only
/// the lifecycle failures it owns.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// No entity record under this id (or wrong tier for the operation).
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// A student or class record without a parent id; indicates a corrupt
    /// store, not a caller mistake.
    #[error("Entity {0} has no parent recorded")]
    MissingParent(String),

    /// Delete refused while active children exist.
    #[error("Cannot delete {tier} {id}: {count} active {child_tier}(s) attached")]
    ActiveChildren {
        tier: Tier,
        id: String,
        count: usize,
        child_tier: Tier,
    },
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = Result<T, HierarchyError>;
