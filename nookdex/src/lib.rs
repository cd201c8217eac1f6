//! # nookdex: collection tracker for Animal Crossing villagers and gyroids
//!
//! `nookdex` is a small HTTP backend that sits in front of a Nookipedia-compatible reference
//! API. It answers catalog queries straight from the upstream API, mirrors the catalog into
//! PostgreSQL on request, and records which villagers and gyroids each user has collected.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses PostgreSQL for persistence.
//!
//! - The **catalog client** ([`catalog`]) fetches villagers and gyroids from the upstream API,
//!   sending the configured API key and version headers. It sits behind the
//!   [`catalog::CatalogSource`] trait.
//! - The **database layer** ([`db`]) uses the repository pattern: one repository per table
//!   group (users, the villager and gyroid mirror, and the collection link tables).
//! - The **API layer** ([`api`]) wires the two together. Query endpoints read from the
//!   upstream API on every call; mirror endpoints insert upstream records that are not yet
//!   stored; collection endpoints validate that the user and collectible exist and then
//!   mutate the link tables inside one transaction.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use nookdex::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     nookdex::install_crypto_provider();
//!
//!     let args = nookdex::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     nookdex::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     Application::new(config).await?.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     }).await
//! }
//! ```
//!
//! ## Database Setup
//!
//! Migrations are embedded and run automatically on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! nookdex::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::{
    catalog::{CatalogSource, ReqwestCatalog},
    openapi::ApiDoc,
};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, patch, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{GyroidName, UserId, VillagerId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .catalog(Arc::new(ReqwestCatalog::new(&config.catalog)?))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub catalog: Arc<dyn CatalogSource>,
}

/// Get the nookdex database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Install the process-wide rustls crypto provider used by the catalog client.
///
/// Safe to call more than once; later calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

/// Connect to PostgreSQL and run migrations
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("database_url is not configured"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await?;
    migrator().run(&pool).await?;

    Ok(pool)
}

/// Create the CORS layer, or `None` when no origins are configured
fn create_cors_layer(config: &Config) -> anyhow::Result<Option<CorsLayer>> {
    if config.cors_allowed_origins.is_empty() {
        return Ok(None);
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    // tower-http rejects "*" inside an origin list
    if config.cors_allowed_origins.iter().any(|origin| origin == "*") {
        return Ok(Some(cors.allow_origin(Any)));
    }

    let mut origins = Vec::with_capacity(config.cors_allowed_origins.len());
    for origin in &config.cors_allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }

    Ok(Some(cors.allow_origin(origins)))
}

/// Build the application router with all endpoints and middleware.
///
/// Routes:
/// - Catalog queries: `/villagers`, `/gyroids`, `/fruit`
/// - Catalog mirror: `/add_villagers`, `/add_gyroids`, `/catalog/*`
/// - Users and their collections: `/users/*`
/// - `/healthz`, `/openapi.json` and the Scalar UI at `/docs`
///
/// # Errors
///
/// Returns an error if a configured CORS origin is not a valid header value.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        // Upstream catalog queries
        .route("/villagers", get(api::handlers::villagers::query_villagers))
        .route("/gyroids", get(api::handlers::gyroids::list_gyroids))
        .route("/fruit", get(api::handlers::fruit::list_fruit))
        // Catalog mirror
        .route("/add_villagers", post(api::handlers::villagers::sync_villagers))
        .route("/add_gyroids", post(api::handlers::gyroids::sync_gyroids))
        .route("/catalog/villagers", get(api::handlers::villagers::list_stored_villagers))
        .route(
            "/catalog/villagers/{villager_id}",
            delete(api::handlers::villagers::delete_villager),
        )
        .route("/catalog/gyroids", get(api::handlers::gyroids::list_stored_gyroids))
        .route("/catalog/gyroids/{name}", delete(api::handlers::gyroids::delete_gyroid))
        // Users
        .route("/users", get(api::handlers::users::list_users))
        .route("/users", post(api::handlers::users::create_user))
        .route("/users/{user_id}", get(api::handlers::users::get_user))
        .route("/users/{user_id}", patch(api::handlers::users::update_user))
        .route("/users/{user_id}", delete(api::handlers::users::delete_user))
        // User-villager relationships
        .route(
            "/users/{user_id}/villagers",
            get(api::handlers::collections::list_user_villagers),
        )
        .route(
            "/users/{user_id}/villagers/{villager_id}",
            post(api::handlers::collections::add_villager_to_user),
        )
        .route(
            "/users/{user_id}/villagers/{villager_id}",
            delete(api::handlers::collections::remove_villager_from_user),
        )
        .route(
            "/users/{user_id}/villagers/{villager_id}/switch/{new_villager_id}",
            patch(api::handlers::collections::switch_user_villager),
        )
        // User-gyroid relationships
        .route("/users/{user_id}/gyroids", get(api::handlers::collections::list_user_gyroids))
        .route(
            "/users/{user_id}/gyroids/{name}",
            post(api::handlers::collections::add_gyroid_to_user),
        )
        .route(
            "/users/{user_id}/gyroids/{name}",
            delete(api::handlers::collections::remove_gyroid_from_user),
        )
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let router = match create_cors_layer(&state.config)? {
        Some(cors_layer) => router.layer(cors_layer),
        None => router,
    };

    // Add tracing layer
    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns the router and the database pool.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs migrations and builds
///    the catalog client and router
/// 2. **Serve**: [`Application::serve`] binds to the configured address and handles requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish, then the pool
///    is closed and telemetry flushed
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application, reusing `pool` when given instead of connecting from config
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting nookdex, catalog at {}", config.catalog.base_url);

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await?;
                pool
            }
            None => setup_database(&config).await?,
        };

        let catalog: Arc<dyn CatalogSource> = Arc::new(ReqwestCatalog::new(&config.catalog)?);
        let app_state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .catalog(catalog)
            .build();

        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("nookdex listening on http://{}", bind_addr);

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::test_utils::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_healthz(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.get("/healthz").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_openapi_and_docs_are_served(pool: PgPool) {
        let app = create_test_app(pool).await;

        let doc: serde_json::Value = app.get("/openapi.json").await.json();
        assert_eq!(doc["info"]["title"], "nookdex API");
        assert!(doc["paths"]["/users/{user_id}/villagers/{villager_id}"].is_object());

        app.get("/docs").await.assert_status_ok();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_cors_allows_configured_origin(pool: PgPool) {
        let mut config = create_test_config("http://127.0.0.1:9");
        config.cors_allowed_origins = vec!["http://localhost:5173".to_string()];
        let app = crate::Application::new_with_pool(config, Some(pool))
            .await
            .expect("Failed to create application")
            .into_test_server();

        let response = app.get("/fruit").add_header("origin", "http://localhost:5173").await;
        response.assert_status_ok();
        assert_eq!(
            response.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
            Some("http://localhost:5173")
        );
    }

    #[test]
    fn test_invalid_cors_origin_is_rejected() {
        let mut config = create_test_config("http://127.0.0.1:9");
        config.cors_allowed_origins = vec!["http://bad\norigin".to_string()];
        assert!(super::create_cors_layer(&config).is_err());
    }
}
