//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Catalog queries** (`/villagers`, `/gyroids`, `/fruit`): read straight from the upstream API
//! - **Catalog mirror** (`/add_villagers`, `/add_gyroids`, `/catalog/*`): the local copy of the catalog
//! - **Users** (`/users/*`): user records
//! - **Collections** (`/users/{user_id}/villagers/*`, `/users/{user_id}/gyroids/*`): what each user owns
//!
//! All endpoints are documented with `utoipa`; the document is served at `/openapi.json` and
//! rendered at `/docs`.

pub mod handlers;
pub mod models;
