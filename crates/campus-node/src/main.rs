//! # Campus-Chain Node
//!
//! Single-process ledger runtime: builds the in-memory store, seeds a small
//! demonstration forest, exercises updates, tombstones and attendance, then
//! runs the forest audit and prints the report and system statistics as
//! JSON.
//!
//! ## Startup Sequence
//!
//! 1. Initialize tracing (RUST_LOG-driven filter)
//! 2. Build the store and services with the default difficulty
//! 3. Seed departments -> classes -> students, mark attendance
//! 4. Run the recursive forest audit
//! 5. Print the audit report and statistics

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cc_02_chain_store::InMemoryChainStore;
use cc_03_validator::ForestValidator;
use cc_04_hierarchy::HierarchyService;
use shared_types::{AttendanceStatus, LedgerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = LedgerConfig::default();
    info!(difficulty = %config.difficulty_prefix, "starting campus-chain node");

    let store = Arc::new(InMemoryChainStore::new());
    let hierarchy = HierarchyService::new(store.clone(), config.clone());
    let validator = ForestValidator::new(store, config);

    seed(&hierarchy).await?;

    let report = validator.validate_forest().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let stats = hierarchy.system_stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    info!(
        valid = report.valid,
        total_invalid = report.summary.total_invalid,
        "audit finished"
    );
    Ok(())
}

/// Seed a small forest: two departments, two classes, three students, a
/// handful of attendance marks, one rename and one tombstone.
async fn seed(hierarchy: &HierarchyService<InMemoryChainStore>) -> Result<()> {
    let computing = hierarchy.create_department("School of Computing").await?;
    let swe = hierarchy
        .create_department("School of Software Engineering")
        .await?;

    let cs101 = hierarchy
        .create_class("CS101 - Intro to Blockchain", &computing.id)
        .await?;
    let swe404 = hierarchy
        .create_class("SWE404 - Secure Systems", &swe.id)
        .await?;

    let alice = hierarchy
        .create_student("Alice Smith", "CS-001", &cs101.id)
        .await?;
    let bob = hierarchy
        .create_student("Bob Johnson", "CS-002", &cs101.id)
        .await?;
    let charlie = hierarchy
        .create_student("Charlie Lee", "SWE-001", &swe404.id)
        .await?;

    for (student, status, notes) in [
        (&alice, AttendanceStatus::Present, "Day 1"),
        (&alice, AttendanceStatus::Present, "Day 2"),
        (&alice, AttendanceStatus::Absent, "Day 3"),
        (&bob, AttendanceStatus::Present, "Day 1"),
        (&bob, AttendanceStatus::Leave, "Day 2 - Sick"),
        (&charlie, AttendanceStatus::Present, "Day 1"),
    ] {
        hierarchy
            .mark_attendance(&student.id, status, None, Some(notes.to_string()))
            .await?;
    }

    // Append-only in action: the rename and the tombstone both land as new
    // blocks while the sealed history stays put.
    hierarchy
        .update_student(
            &alice.id,
            shared_types::StudentUpdate {
                name: Some("Alice Smith-Jones".to_string()),
                roll_no: None,
            },
        )
        .await?;
    hierarchy.delete_student(&charlie.id).await?;

    info!("seeded demonstration forest");
    Ok(())
}
