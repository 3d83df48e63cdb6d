//! System statistics aggregated over the forest.

use serde::{Deserialize, Serialize};

/// Full statistics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub entities: EntityCounts,
    pub blockchain: BlockchainStats,
    pub attendance: AttendanceStats,
}

/// Active entity counts per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCounts {
    pub departments: usize,
    pub classes: usize,
    pub students: usize,
}

/// Ledger-level counters. Chains of deleted entities are included; their
/// history is part of the ledger forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainStats {
    pub total_blocks: u64,
    pub department_chains: usize,
    pub class_chains: usize,
    pub student_chains: usize,
    pub avg_chain_length: f64,
    pub difficulty: String,
}

/// Attendance tallies across all student chains.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total_records: u64,
    pub present: u64,
    pub absent: u64,
    pub leave: u64,
    pub present_percentage: f64,
    pub absent_percentage: f64,
    pub leave_percentage: f64,
}

impl AttendanceStats {
    /// Derive the percentage fields from the raw tallies.
    pub fn finalize_percentages(&mut self) {
        if self.total_records == 0 {
            return;
        }
        let total = self.total_records as f64;
        self.present_percentage = self.present as f64 / total * 100.0;
        self.absent_percentage = self.absent as f64 / total * 100.0;
        self.leave_percentage = self.leave as f64 / total * 100.0;
    }
}
