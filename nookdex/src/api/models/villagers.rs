//! API request/response models for villagers.

use crate::catalog::models::VillagerRecord;
use crate::db::models::{collections::CollectedVillagerDBResponse, villagers::VillagerDBResponse};
use crate::types::{Personality, Species, VillagerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// A villager, with species and personality in lowercase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VillagerResponse {
    pub villager_id: VillagerId,
    pub name: String,
    pub species: String,
    pub personality: String,
    pub quote: String,
}

/// A villager in a user's collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollectedVillagerResponse {
    pub villager_id: VillagerId,
    pub name: String,
    pub species: String,
    pub personality: String,
    pub quote: String,
    pub added_at: DateTime<Utc>,
}

/// Filters for querying the upstream catalog. Species is required.
#[derive(Debug, Deserialize, IntoParams)]
pub struct VillagerQuery {
    pub species: Species,
    pub personality: Option<Personality>,
}

/// Filters for listing the local mirror
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StoredVillagerQuery {
    pub species: Option<Species>,
    pub personality: Option<Personality>,
}

impl From<VillagerRecord> for VillagerResponse {
    fn from(record: VillagerRecord) -> Self {
        let record = record.normalized();
        Self {
            villager_id: record.id,
            name: record.name,
            species: record.species,
            personality: record.personality,
            quote: record.quote,
        }
    }
}

impl From<VillagerDBResponse> for VillagerResponse {
    fn from(db: VillagerDBResponse) -> Self {
        Self {
            villager_id: db.villager_id,
            name: db.name,
            species: db.species,
            personality: db.personality,
            quote: db.quote,
        }
    }
}

impl From<CollectedVillagerDBResponse> for CollectedVillagerResponse {
    fn from(db: CollectedVillagerDBResponse) -> Self {
        Self {
            villager_id: db.villager_id,
            name: db.name,
            species: db.species,
            personality: db.personality,
            quote: db.quote,
            added_at: db.added_at,
        }
    }
}
