//! API request/response models for users.

use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// User request models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserCreate {
    /// Explicit ID for the new user. Generated when omitted.
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub username: String,
    /// One of the values returned by `GET /fruit` (case-insensitive)
    pub native_fruit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub native_fruit: Option<String>,
}

// User response models
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: UserId,
    pub username: String,
    pub native_fruit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListUsersQuery {
    /// Case-insensitive substring match on the username
    pub search: Option<String>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            user_id: db.user_id,
            username: db.username,
            native_fruit: db.native_fruit,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
