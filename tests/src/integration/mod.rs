//! Cross-subsystem integration flows.

pub mod concurrency;
pub mod ledger_flows;
pub mod tampering;
