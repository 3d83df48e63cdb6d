//! Ports for the storage subsystem.

mod outbound;

pub use outbound::{ChainStore, EntityPatch, StoreError, SystemTimeSource, TimeSource};
