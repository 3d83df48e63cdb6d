//! Domain model: blocks, chains, genesis policies, errors.

mod block;
mod chain;
mod error;
mod genesis;

pub use block::Block;
pub use chain::{validate_blocks, Chain};
pub use error::{ChainError, ChainResult};
pub use genesis::GenesisPolicy;
