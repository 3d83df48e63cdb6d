//! Audit report types.
//!
//! The report mirrors the three-tier hierarchy and serializes with
//! camelCase wire names for UI and API consumers.

use serde::{Deserialize, Serialize};

/// Top-level audit report over the whole forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True iff no node in the forest failed.
    pub valid: bool,
    pub departments: Vec<DepartmentReport>,
    pub summary: ReportSummary,
}

/// Aggregate counters for the audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_invalid: u64,
}

/// Per-department node of the report tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentReport {
    pub id: String,
    pub chain_id: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub classes: Vec<ClassReport>,
}

/// Per-class node of the report tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassReport {
    pub id: String,
    pub chain_id: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub students: Vec<StudentReport>,
}

/// Per-student leaf of the report tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReport {
    pub id: String,
    pub chain_id: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
