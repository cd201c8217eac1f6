//! Database record models matching table schemas.
//!
//! This module contains struct definitions that directly correspond to database
//! table rows. These models are used by repositories to return query results
//! and accept insertion/update data.
//!
//! # Model Categories
//!
//! - [`users`]: User records and their native fruit
//! - [`villagers`]: Mirrored villager catalog rows
//! - [`gyroids`]: Mirrored gyroid catalog rows
//! - [`collections`]: Rows of a user's collection, joined with the catalog entity
//!
//! Database models are distinct from API models so storage and wire representations can
//! evolve independently. API models implement `From` conversions from these types.

pub mod collections;
pub mod gyroids;
pub mod users;
pub mod villagers;
