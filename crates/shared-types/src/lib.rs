//! # Shared Types Crate
//!
//! This crate contains the domain entities shared by every Campus-Chain
//! subsystem: the three-tier hierarchy model, chain identifiers, the tagged
//! transaction records that blocks carry, and the ledger configuration.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Canonical Serialization**: The JSON text of [`Transaction`] values is
//!   part of the ledger's hash preimage. Field order and value text are a
//!   portability contract, not an implementation detail.
//! - **Explicit Configuration**: Difficulty and mining/retry bounds travel in
//!   [`LedgerConfig`]; there is no global difficulty constant.

pub mod config;
pub mod entities;
pub mod transactions;

pub use config::{LedgerConfig, GENESIS_SENTINEL};
pub use entities::*;
pub use transactions::*;
