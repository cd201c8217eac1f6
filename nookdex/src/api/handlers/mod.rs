//! HTTP request handlers for all API endpoints.
//!
//! Handlers are organized by resource. Each one deserializes the request, talks to the
//! upstream catalog through [`crate::catalog::CatalogSource`] or to the database through the
//! repositories in [`crate::db::handlers`], and serializes the response.
//!
//! - [`villagers`]: Upstream villager queries and the villager mirror
//! - [`gyroids`]: Upstream gyroid listing and the gyroid mirror
//! - [`fruit`]: The fixed list of native fruits
//! - [`users`]: User CRUD
//! - [`collections`]: Adding, switching and removing collectibles in a user's collection
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which converts to the matching HTTP status code and
//! a JSON `{"detail": ...}` body.

pub mod collections;
pub mod fruit;
pub mod gyroids;
pub mod users;
pub mod villagers;
