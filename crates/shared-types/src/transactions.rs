//! # Transaction Records
//!
//! The tagged records carried inside blocks. The JSON text of these types is
//! part of every block's hash preimage, so their serialized shape is a
//! portability contract:
//!
//! - the `type` discriminator is an external tag with `snake_case` names
//!   (`department_genesis`, `attendance_mark`, ...)
//! - struct fields serialize in declaration order with `camelCase` names
//! - optional fields are omitted entirely when absent
//!
//! Changing any of this invalidates every previously sealed hash.

use serde::{Deserialize, Serialize};

/// Genesis metadata for a department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentMeta {
    pub id: String,
    pub name: String,
}

/// Genesis metadata for a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMeta {
    pub id: String,
    pub parent_dept_id: String,
    pub name: String,
}

/// Genesis metadata for a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMeta {
    pub id: String,
    pub parent_class_id: String,
    pub name: String,
    pub roll_no: String,
}

/// Update payload for departments and classes (name only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameUpdate {
    pub name: String,
}

/// Update payload for students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
}

/// Attendance outcome recorded for a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

/// A tagged transaction record.
///
/// One block carries an ordered sequence of these; in practice every write
/// produces a single-transaction block, but the ledger format does not
/// assume that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transaction {
    DepartmentGenesis { meta: DepartmentMeta },
    DepartmentUpdate { update: NameUpdate },
    DepartmentDelete,
    ClassGenesis { meta: ClassMeta },
    ClassUpdate { update: NameUpdate },
    ClassDelete,
    StudentGenesis { meta: StudentMeta },
    StudentUpdate { update: StudentUpdate },
    StudentDelete,
    #[serde(rename_all = "camelCase")]
    AttendanceMark {
        student_id: String,
        class_id: String,
        status: AttendanceStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
}

impl Transaction {
    /// Whether this record is a tier genesis.
    pub fn is_genesis(&self) -> bool {
        matches!(
            self,
            Transaction::DepartmentGenesis { .. }
                | Transaction::ClassGenesis { .. }
                | Transaction::StudentGenesis { .. }
        )
    }

    /// Whether this record is a logical-delete tombstone.
    pub fn is_tombstone(&self) -> bool {
        matches!(
            self,
            Transaction::DepartmentDelete | Transaction::ClassDelete | Transaction::StudentDelete
        )
    }
}
