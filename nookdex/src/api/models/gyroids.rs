//! API response models for gyroids.

use crate::catalog::models::GyroidRecord;
use crate::db::models::{collections::CollectedGyroidDBResponse, gyroids::GyroidDBResponse};
use crate::types::GyroidName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GyroidResponse {
    pub name: GyroidName,
    pub sound: String,
}

/// A gyroid in a user's collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollectedGyroidResponse {
    pub name: GyroidName,
    pub sound: String,
    pub added_at: DateTime<Utc>,
}

impl From<GyroidRecord> for GyroidResponse {
    fn from(record: GyroidRecord) -> Self {
        Self {
            name: record.name,
            sound: record.sound,
        }
    }
}

impl From<GyroidDBResponse> for GyroidResponse {
    fn from(db: GyroidDBResponse) -> Self {
        Self {
            name: db.gyroid_name,
            sound: db.sound,
        }
    }
}

impl From<CollectedGyroidDBResponse> for CollectedGyroidResponse {
    fn from(db: CollectedGyroidDBResponse) -> Self {
        Self {
            name: db.gyroid_name,
            sound: db.sound,
            added_at: db.added_at,
        }
    }
}
