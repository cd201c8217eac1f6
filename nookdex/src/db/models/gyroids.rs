//! Database models for the mirrored gyroid catalog.

use crate::catalog::models::GyroidRecord;
use crate::types::GyroidName;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for inserting a gyroid into the mirror
#[derive(Debug, Clone, PartialEq)]
pub struct GyroidCreateDBRequest {
    pub gyroid_name: GyroidName,
    pub sound: String,
}

impl From<GyroidRecord> for GyroidCreateDBRequest {
    fn from(record: GyroidRecord) -> Self {
        Self {
            gyroid_name: record.name,
            sound: record.sound,
        }
    }
}

/// A mirrored gyroid row
#[derive(Debug, Clone, FromRow)]
pub struct GyroidDBResponse {
    pub gyroid_name: GyroidName,
    pub sound: String,
    pub created_at: DateTime<Utc>,
}
