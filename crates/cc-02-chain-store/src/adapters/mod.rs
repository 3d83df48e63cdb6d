//! Adapter implementations for the storage ports.

mod memory;

pub use memory::InMemoryChainStore;
