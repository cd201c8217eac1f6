//! Database models for user collections (the link tables joined with the catalog).

use crate::types::{GyroidName, VillagerId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A villager in a user's collection
#[derive(Debug, Clone, FromRow)]
pub struct CollectedVillagerDBResponse {
    pub villager_id: VillagerId,
    pub name: String,
    pub species: String,
    pub personality: String,
    pub quote: String,
    pub added_at: DateTime<Utc>,
}

/// A gyroid in a user's collection
#[derive(Debug, Clone, FromRow)]
pub struct CollectedGyroidDBResponse {
    pub gyroid_name: GyroidName,
    pub sound: String,
    pub added_at: DateTime<Utc>,
}
