//! Database models for users.

use crate::api::models::users::{UserCreate, UserUpdate};
use crate::types::UserId;
use chrono::{DateTime, Utc};

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    /// Explicit ID, or `None` to let the database assign one
    pub user_id: Option<UserId>,
    pub username: String,
    pub native_fruit: String,
}

impl From<UserCreate> for UserCreateDBRequest {
    fn from(api: UserCreate) -> Self {
        Self {
            user_id: api.user_id,
            username: api.username.trim().to_string(),
            native_fruit: api.native_fruit,
        }
    }
}

/// Database request for updating a user
#[derive(Debug, Clone)]
pub struct UserUpdateDBRequest {
    pub username: Option<String>,
    pub native_fruit: Option<String>,
}

impl From<UserUpdate> for UserUpdateDBRequest {
    fn from(update: UserUpdate) -> Self {
        Self {
            username: update.username.map(|u| u.trim().to_string()),
            native_fruit: update.native_fruit,
        }
    }
}

/// Database response for a user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserDBResponse {
    pub user_id: UserId,
    pub username: String,
    pub native_fruit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
