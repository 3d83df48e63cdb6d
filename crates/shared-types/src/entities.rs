//! # Core Domain Entities
//!
//! Defines the hierarchy entities of the ledger forest.
//!
//! ## Clusters
//!
//! - **Hierarchy**: [`Tier`], [`ChainId`], [`EntityRecord`]
//! - **Lifecycle**: [`EntityStatus`], [`EntityHandle`]
//!
//! Every entity owns exactly one chain; the chain id is derived from the
//! tier prefix and the entity's UUID (`dept-<uuid>`, `class-<uuid>`,
//! `student-<uuid>`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three tiers of the ledger forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Root tier. Genesis links to the sentinel hash.
    Department,
    /// Mid tier. Genesis links into a department chain.
    Class,
    /// Leaf tier. Genesis links into a class chain.
    Student,
}

impl Tier {
    /// Chain id prefix for this tier.
    pub fn prefix(self) -> &'static str {
        match self {
            Tier::Department => "dept",
            Tier::Class => "class",
            Tier::Student => "student",
        }
    }

    /// The tier one level down, if any.
    pub fn child(self) -> Option<Tier> {
        match self {
            Tier::Department => Some(Tier::Class),
            Tier::Class => Some(Tier::Student),
            Tier::Student => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Department => "department",
            Tier::Class => "class",
            Tier::Student => "student",
        };
        f.write_str(name)
    }
}

/// Identifier of a single chain, e.g. `student-6e9c...`.
///
/// Parent linkage across chains is by content hash only; the chain id is
/// purely an addressing key for the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Build a chain id from a tier and entity id.
    pub fn new(tier: Tier, entity_id: &str) -> Self {
        Self(format!("{}-{}", tier.prefix(), entity_id))
    }

    /// Parse a raw chain id into its tier and entity id.
    ///
    /// Returns `None` for unknown prefixes or malformed input.
    pub fn parse(raw: &str) -> Option<(Tier, &str)> {
        let (prefix, id) = raw.split_once('-')?;
        if id.is_empty() {
            return None;
        }
        let tier = match prefix {
            "dept" => Tier::Department,
            "class" => Tier::Class,
            "student" => Tier::Student,
            _ => return None,
        };
        Some((tier, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Lifecycle status of an entity.
///
/// Deletion is logical: the chain records a tombstone block and is retained
/// permanently; only the surrounding entity record flips to `Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    Deleted,
}

/// The entity record stored alongside each chain.
///
/// This is application state, not ledger state: the chain itself is the
/// authoritative history, the record is the current materialized view that
/// drives listings, delete guards, and the validator's forest walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    /// UUID of the entity.
    pub entity_id: String,
    /// Which tier this entity belongs to.
    pub tier: Tier,
    /// Parent entity id (`None` for departments).
    pub parent_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Roll number (students only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    /// Current lifecycle status.
    pub status: EntityStatus,
    /// ISO-8601 creation timestamp, taken from the genesis block.
    pub created_at: String,
}

impl EntityRecord {
    /// The id of the chain this entity owns.
    pub fn chain_id(&self) -> ChainId {
        ChainId::new(self.tier, &self.entity_id)
    }

    pub fn is_active(&self) -> bool {
        self.status == EntityStatus::Active
    }
}

/// Handle returned from entity creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityHandle {
    pub id: String,
    pub chain_id: ChainId,
}
