//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed operations for one table (or link table pair)
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Users`]: User records; implements [`Repository`]
//! - [`Villagers`]: Mirrored villager catalog, insert-if-absent semantics
//! - [`Gyroids`]: Mirrored gyroid catalog, insert-if-absent semantics
//! - [`Collections`]: User↔villager and user↔gyroid links
//!
//! # Common Pattern
//!
//! ```ignore
//! use nookdex::db::handlers::{Collections, Users, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!
//!     if Users::new(&mut tx).exists(1).await? {
//!         Collections::new(&mut tx).add_villager(1, "cat00").await?;
//!     }
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod collections;
pub mod gyroids;
pub mod repository;
pub mod users;
pub mod villagers;

pub use collections::Collections;
pub use gyroids::Gyroids;
pub use repository::Repository;
pub use users::Users;
pub use villagers::Villagers;
