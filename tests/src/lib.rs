//! # Campus-Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-subsystem flows
//!     ├── ledger_flows.rs   # End-to-end hierarchy + audit scenarios
//!     ├── concurrency.rs    # Concurrent-writer behaviour
//!     └── tampering.rs      # Corruption detection through the validator
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cc-tests
//!
//! # By category
//! cargo test -p cc-tests integration::
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
