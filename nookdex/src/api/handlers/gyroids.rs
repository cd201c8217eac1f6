use crate::{
    AppState,
    api::models::{catalog::SyncResponse, gyroids::GyroidResponse},
    db::{handlers::Gyroids, models::gyroids::GyroidCreateDBRequest},
    errors::{Error, Result},
    types::GyroidName,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::Acquire;

/// List every gyroid in the upstream catalog.
#[utoipa::path(
    get,
    path = "/gyroids",
    tag = "gyroids",
    summary = "List gyroids",
    responses(
        (status = 200, description = "All gyroids in the catalog", body = Vec<GyroidResponse>),
        (status = 502, description = "Catalog API unavailable"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_gyroids(State(state): State<AppState>) -> Result<Json<Vec<GyroidResponse>>> {
    let records = state.catalog.fetch_gyroids().await?;
    Ok(Json(records.into_iter().map(GyroidResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/add_gyroids",
    tag = "catalog",
    summary = "Mirror upstream gyroids",
    description = "Fetch every gyroid from the catalog API and store the ones not already present. \
                   Stored gyroids are never updated.",
    responses(
        (status = 200, description = "Gyroids synced", body = SyncResponse),
        (status = 502, description = "Catalog API unavailable"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn sync_gyroids(State(state): State<AppState>) -> Result<Json<SyncResponse>> {
    let records = state.catalog.fetch_gyroids().await?;
    let fetched = records.len();
    let requests: Vec<GyroidCreateDBRequest> = records.into_iter().map(Into::into).collect();

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let (inserted, stored) = {
        let mut repo = Gyroids::new(tx.acquire().await.map_err(|e| Error::Database(e.into()))?);
        let inserted = repo.insert_many_if_absent(&requests).await?;
        (inserted, repo.count().await?)
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    tracing::info!("Mirrored gyroids: {} fetched, {} new, {} stored", fetched, inserted, stored);

    Ok(Json(SyncResponse {
        message: "Gyroids synced".to_string(),
        fetched,
        inserted,
    }))
}

#[utoipa::path(
    get,
    path = "/catalog/gyroids",
    tag = "catalog",
    summary = "List stored gyroids",
    responses(
        (status = 200, description = "Gyroids in the local mirror", body = Vec<GyroidResponse>),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_stored_gyroids(State(state): State<AppState>) -> Result<Json<Vec<GyroidResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let gyroids = Gyroids::new(&mut pool_conn).list().await?;

    Ok(Json(gyroids.into_iter().map(GyroidResponse::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/catalog/gyroids/{name}",
    tag = "catalog",
    summary = "Delete stored gyroid",
    description = "Remove a gyroid from the local mirror. Every collection link to it is removed as well.",
    params(
        ("name" = String, Path, description = "Gyroid name"),
    ),
    responses(
        (status = 204, description = "Gyroid deleted"),
        (status = 404, description = "Gyroid not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_gyroid(State(state): State<AppState>, Path(name): Path<GyroidName>) -> Result<StatusCode> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    if Gyroids::new(&mut pool_conn).delete(&name).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("Gyroid", name))
    }
}
