//! API models for catalog synchronisation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of mirroring the upstream catalog into the database
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncResponse {
    pub message: String,
    /// Records returned by the upstream API
    pub fetched: usize,
    /// Records that were not already stored
    pub inserted: u64,
}
