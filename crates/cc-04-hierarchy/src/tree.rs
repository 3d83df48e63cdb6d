//! Nested hierarchy view for explorer UIs.

use serde::{Deserialize, Serialize};
use shared_types::{EntityRecord, Tier};

/// One node of the active-forest tree.
///
/// Students are leaves: they serialize without a `children` field and carry
/// their roll number instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub id: String,
    pub name: String,
    pub chain_id: String,
    #[serde(rename = "type")]
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Branch node (department or class).
    pub fn branch(record: &EntityRecord) -> Self {
        Self {
            id: record.entity_id.clone(),
            name: record.name.clone(),
            chain_id: record.chain_id().to_string(),
            tier: record.tier,
            roll_no: None,
            children: Vec::new(),
        }
    }

    /// Leaf node (student).
    pub fn leaf(record: &EntityRecord) -> Self {
        Self {
            roll_no: record.roll_no.clone(),
            ..Self::branch(record)
        }
    }
}
