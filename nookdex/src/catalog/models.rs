//! Wire models for the upstream reference catalog.
//!
//! Only the fields the tracker uses are modelled; everything else the upstream returns is
//! ignored during deserialization.

use crate::types::{Personality, Species};
use serde::{Deserialize, Serialize};

/// A villager as returned by `GET {base}/villagers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillagerRecord {
    pub id: String,
    pub name: String,
    pub species: String,
    pub personality: String,
    #[serde(default)]
    pub quote: String,
}

impl VillagerRecord {
    /// Lowercases species and personality, which is how they are compared and stored.
    pub fn normalized(mut self) -> Self {
        self.species = self.species.trim().to_lowercase();
        self.personality = self.personality.trim().to_lowercase();
        self
    }

    /// Whether this record matches the given filters. Personality is skipped when `None`.
    pub fn matches(&self, species: Species, personality: Option<Personality>) -> bool {
        self.species.trim().eq_ignore_ascii_case(species.as_str())
            && personality.is_none_or(|p| self.personality.trim().eq_ignore_ascii_case(p.as_str()))
    }
}

/// A gyroid as returned by `GET {base}/nh/gyroids`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GyroidRecord {
    pub name: String,
    pub sound: String,
}

/// Filters upstream villagers by species and optional personality, returning normalized records.
pub fn filter_villagers(records: Vec<VillagerRecord>, species: Species, personality: Option<Personality>) -> Vec<VillagerRecord> {
    records
        .into_iter()
        .filter(|record| record.matches(species, personality))
        .map(VillagerRecord::normalized)
        .collect()
}
