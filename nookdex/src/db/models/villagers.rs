//! Database models for the mirrored villager catalog.

use crate::catalog::models::VillagerRecord;
use crate::types::VillagerId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for inserting a villager into the mirror
#[derive(Debug, Clone, PartialEq)]
pub struct VillagerCreateDBRequest {
    pub villager_id: VillagerId,
    pub name: String,
    pub species: String,
    pub personality: String,
    pub quote: String,
}

impl From<VillagerRecord> for VillagerCreateDBRequest {
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

/// A mirrored villager row
#[derive(Debug, Clone, FromRow)]
pub struct VillagerDBResponse {
    pub villager_id: VillagerId,
    pub name: String,
    pub species: String,
    pub personality: String,
    pub quote: String,
    pub created_at: DateTime<Utc>,
}
