//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Transactions
//!
//! Repositories borrow a `PgConnection`, so they work equally on a pooled connection or inside a
//! transaction. Handlers that perform more than one statement for a single logical operation
//! create all repositories from one transaction and commit once at the end:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! Collections::new(&mut tx).switch_villager(user_id, "cat00", "dog00").await?;
//! tx.commit().await?;
//! ```
//!
//! # Migrations
//!
//! The schema lives in `migrations/` and is applied at startup through [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
