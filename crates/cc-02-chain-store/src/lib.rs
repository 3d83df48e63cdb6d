//! # cc-02-chain-store
//!
//! Storage subsystem for Campus-Chain.
//!
//! ## Architecture
//!
//! The ledger core never talks to a backend directly; it consumes the
//! [`ChainStore`] outbound port. The contract is deliberately small:
//!
//! - `latest_block` / `load_chain` — point-in-time reads
//! - `create_chain` — one-shot persist of an entity record plus its genesis
//! - `append_block` — optimistic conditional append: commits only if the
//!   stored tip hash still equals what the writer read, otherwise returns
//!   [`StoreError::Conflict`] for the caller to retry
//!
//! The conditional append is what serializes concurrent writers per chain:
//! two writers may both mine a candidate block N+1 from the same tip, but
//! at most one commit succeeds, so the strict linear-index invariant holds.
//!
//! Production backend choice is a host concern. The in-memory adapter here
//! backs tests and single-process deployments.

pub mod adapters;
pub mod ports;

pub use adapters::InMemoryChainStore;
pub use ports::{ChainStore, EntityPatch, StoreError, SystemTimeSource, TimeSource};
