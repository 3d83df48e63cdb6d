//! # cc-01-chain
//!
//! Chain core for Campus-Chain: the sealed [`Block`], the per-entity
//! append-only [`Chain`], bounded proof-of-work mining, and the per-tier
//! [`GenesisPolicy`].
//!
//! ## Architecture
//!
//! This crate is pure domain logic. It performs no I/O: chains are built
//! from blocks loaded by the store subsystem (cc-02) and validated by the
//! forest validator (cc-03). Timestamps are passed in by callers so mining
//! is a deterministic search.
//!
//! ## Invariants
//!
//! - `block.hash == sha256(index ‖ timestamp ‖ tx_json ‖ prev_hash ‖
//!   nonce)`, and every sealed hash carries the difficulty prefix.
//! - Indices start at 0 and increase by exactly 1.
//! - `blocks[i].prev_hash == blocks[i-1].hash`; block 0 links to the
//!   sentinel (departments) or a parent-chain hash (classes, students).
//! - Sealed blocks are never mutated; a chain only grows.

pub mod domain;

pub use domain::{
    validate_blocks, Block, Chain, ChainError, ChainResult, GenesisPolicy,
};
