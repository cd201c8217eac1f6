//! API request and response data models.
//!
//! This module contains the data structures used for HTTP request deserialization
//! and response serialization. These models define the public API contract.
//!
//! API models are distinct from database models (see [`crate::db::models`]) and from the
//! upstream catalog wire models (see [`crate::catalog::models`]); each implements `From`
//! conversions from the layer below it.
//!
//! - [`users`]: User profiles and creation/update requests
//! - [`villagers`]: Villagers, collected villagers and the villager filters
//! - [`gyroids`]: Gyroids and collected gyroids
//! - [`catalog`]: Catalog synchronisation results

pub mod catalog;
pub mod gyroids;
pub mod users;
pub mod villagers;
