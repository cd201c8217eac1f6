//! Handlers for the villagers and gyroids in a user's collection.
//!
//! Every mutation checks that the user and the collectible exist before touching the link
//! tables, so a missing entity is reported by name rather than as a constraint violation. The
//! checks and the mutation share one transaction.

use crate::{
    AppState,
    api::models::{gyroids::CollectedGyroidResponse, villagers::CollectedVillagerResponse},
    db::handlers::{Collections, Gyroids, Users, Villagers},
    errors::{Error, Result},
    types::{GyroidName, UserId, VillagerId},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::{Acquire, PgConnection};

async fn ensure_user(conn: &mut PgConnection, user_id: UserId) -> Result<()> {
    if !Users::new(conn).exists(user_id).await? {
        return Err(Error::not_found("User", user_id));
    }
    Ok(())
}

async fn ensure_villager(conn: &mut PgConnection, villager_id: &str) -> Result<()> {
    if Villagers::new(conn).get_by_id(villager_id).await?.is_none() {
        return Err(Error::not_found("Villager", villager_id));
    }
    Ok(())
}

async fn ensure_gyroid(conn: &mut PgConnection, gyroid_name: &str) -> Result<()> {
    if Gyroids::new(conn).get_by_id(gyroid_name).await?.is_none() {
        return Err(Error::not_found("Gyroid", gyroid_name));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/villagers",
    tag = "collections",
    summary = "List user villagers",
    params(
        ("user_id" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Villagers in the user's collection", body = Vec<CollectedVillagerResponse>),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_user_villagers(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<CollectedVillagerResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    ensure_user(&mut pool_conn, user_id).await?;

    let villagers = Collections::new(&mut pool_conn).list_villagers(user_id).await?;
    Ok(Json(villagers.into_iter().map(CollectedVillagerResponse::from).collect()))
}

/// Add a villager to a user's collection. Adding a villager the user already has is a no-op.
#[utoipa::path(
    post,
    path = "/users/{user_id}/villagers/{villager_id}",
    tag = "collections",
    summary = "Add villager to user",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("villager_id" = String, Path, description = "Villager ID"),
    ),
    responses(
        (status = 204, description = "Villager added to the collection"),
        (status = 404, description = "User or villager not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_villager_to_user(
    State(state): State<AppState>,
    Path((user_id, villager_id)): Path<(UserId, VillagerId)>,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;

    ensure_user(conn, user_id).await?;
    ensure_villager(conn, &villager_id).await?;
    Collections::new(conn).add_villager(user_id, &villager_id).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace one villager in a user's collection with another.
///
/// All three entities are checked before anything changes: when the new villager does not
/// exist, the old one stays in the collection.
#[utoipa::path(
    patch,
    path = "/users/{user_id}/villagers/{villager_id}/switch/{new_villager_id}",
    tag = "collections",
    summary = "Switch user villager",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("villager_id" = String, Path, description = "Villager leaving the collection"),
        ("new_villager_id" = String, Path, description = "Villager joining the collection"),
    ),
    responses(
        (status = 204, description = "Villager switched"),
        (status = 404, description = "User or villager not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn switch_user_villager(
    State(state): State<AppState>,
    Path((user_id, old_villager_id, new_villager_id)): Path<(UserId, VillagerId, VillagerId)>,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;

    ensure_user(conn, user_id).await?;
    ensure_villager(conn, &old_villager_id).await?;
    ensure_villager(conn, &new_villager_id).await?;
    Collections::new(conn)
        .switch_villager(user_id, &old_villager_id, &new_villager_id)
        .await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a villager from a user's collection. The villager stays in the catalog.
#[utoipa::path(
    delete,
    path = "/users/{user_id}/villagers/{villager_id}",
    tag = "collections",
    summary = "Remove villager from user",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("villager_id" = String, Path, description = "Villager ID"),
    ),
    responses(
        (status = 204, description = "Villager removed from the collection"),
        (status = 404, description = "User not found, or the villager is not in the collection"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn remove_villager_from_user(
    State(state): State<AppState>,
    Path((user_id, villager_id)): Path<(UserId, VillagerId)>,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;

    ensure_user(conn, user_id).await?;
    if !Collections::new(conn).remove_villager(user_id, &villager_id).await? {
        return Err(Error::not_found("Villager link", format!("{user_id}/{villager_id}")));
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/gyroids",
    tag = "collections",
    summary = "List user gyroids",
    params(
        ("user_id" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Gyroids in the user's collection", body = Vec<CollectedGyroidResponse>),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_user_gyroids(State(state): State<AppState>, Path(user_id): Path<UserId>) -> Result<Json<Vec<CollectedGyroidResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    ensure_user(&mut pool_conn, user_id).await?;

    let gyroids = Collections::new(&mut pool_conn).list_gyroids(user_id).await?;
    Ok(Json(gyroids.into_iter().map(CollectedGyroidResponse::from).collect()))
}

/// Add a gyroid to a user's collection. Adding a gyroid the user already has is a no-op.
#[utoipa::path(
    post,
    path = "/users/{user_id}/gyroids/{name}",
    tag = "collections",
    summary = "Add gyroid to user",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("name" = String, Path, description = "Gyroid name"),
    ),
    responses(
        (status = 204, description = "Gyroid added to the collection"),
        (status = 404, description = "User or gyroid not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_gyroid_to_user(
    State(state): State<AppState>,
    Path((user_id, name)): Path<(UserId, GyroidName)>,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;

    ensure_user(conn, user_id).await?;
    ensure_gyroid(conn, &name).await?;
    Collections::new(conn).add_gyroid(user_id, &name).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a gyroid from a user's collection. The gyroid stays in the catalog.
#[utoipa::path(
    delete,
    path = "/users/{user_id}/gyroids/{name}",
    tag = "collections",
    summary = "Remove gyroid from user",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("name" = String, Path, description = "Gyroid name"),
    ),
    responses(
        (status = 204, description = "Gyroid removed from the collection"),
        (status = 404, description = "User not found, or the gyroid is not in the collection"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn remove_gyroid_from_user(
    State(state): State<AppState>,
    Path((user_id, name)): Path<(UserId, GyroidName)>,
) -> Result<StatusCode> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let conn = tx.acquire().await.map_err(|e| Error::Database(e.into()))?;

    ensure_user(conn, user_id).await?;
    if !Collections::new(conn).remove_gyroid(user_id, &name).await? {
        return Err(Error::not_found("Gyroid link", format!("{user_id}/{name}")));
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}
