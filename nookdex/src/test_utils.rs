//! Shared fixtures for repository and handler tests.

use crate::config::{CatalogConfig, Config};
use crate::db::{
    handlers::{Gyroids, Repository, Users, Villagers},
    models::{
        gyroids::GyroidCreateDBRequest,
        users::{UserCreateDBRequest, UserDBResponse},
        villagers::VillagerCreateDBRequest,
    },
};
use axum_test::TestServer;
use sqlx::PgPool;
use std::time::Duration;
use wiremock::MockServer;

/// Address nothing listens on, for tests that never reach the catalog
const UNUSED_CATALOG_URL: &str = "http://127.0.0.1:9";

pub fn create_test_config(catalog_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        // The test pool is passed in directly
        database_url: None,
        max_connections: 1,
        catalog: CatalogConfig {
            base_url: catalog_url.parse().expect("Invalid catalog URL"),
            api_key: "test-api-key".to_string(),
            accept_version: "1.0.0".to_string(),
            request_timeout: Some(Duration::from_secs(5)),
        },
        cors_allowed_origins: Vec::new(),
        enable_otel_export: false,
    }
}

async fn build_test_app(pool: PgPool, catalog_url: &str) -> TestServer {
    crate::install_crypto_provider();
    crate::Application::new_with_pool(create_test_config(catalog_url), Some(pool))
        .await
        .expect("Failed to create application")
        .into_test_server()
}

/// Test server whose catalog client points at an unreachable address
pub async fn create_test_app(pool: PgPool) -> TestServer {
    build_test_app(pool, UNUSED_CATALOG_URL).await
}

/// Test server whose catalog client talks to `server`
pub async fn create_test_app_with_catalog(pool: PgPool, server: &MockServer) -> TestServer {
    build_test_app(pool, &server.uri()).await
}

pub async fn create_test_user(pool: &PgPool, username: &str) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            user_id: None,
            username: username.to_string(),
            native_fruit: "Peach".to_string(),
        })
        .await
        .expect("Failed to create test user")
}

/// A villager request whose name is the upper-cased ID
pub fn villager_request(villager_id: &str, species: &str, personality: &str) -> VillagerCreateDBRequest {
    VillagerCreateDBRequest {
        villager_id: villager_id.to_string(),
        name: villager_id.to_uppercase(),
        species: species.to_string(),
        personality: personality.to_string(),
        quote: format!("I'm {villager_id}!"),
    }
}

pub fn gyroid_request(name: &str) -> GyroidCreateDBRequest {
    GyroidCreateDBRequest {
        gyroid_name: name.to_string(),
        sound: "Mid".to_string(),
    }
}

/// Stores a lazy cat villager in the mirror
pub async fn create_test_villager(pool: &PgPool, villager_id: &str) {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Villagers::new(&mut conn)
        .insert_many_if_absent(&[villager_request(villager_id, "cat", "lazy")])
        .await
        .expect("Failed to create test villager");
}

pub async fn create_test_gyroid(pool: &PgPool, name: &str) {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Gyroids::new(&mut conn)
        .insert_many_if_absent(&[gyroid_request(name)])
        .await
        .expect("Failed to create test gyroid");
}
