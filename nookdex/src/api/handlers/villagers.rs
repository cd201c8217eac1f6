use crate::{
    AppState,
    api::models::{
        catalog::SyncResponse,
        villagers::{StoredVillagerQuery, VillagerQuery, VillagerResponse},
    },
    catalog::models::filter_villagers,
    db::{
        handlers::{Villagers, villagers::VillagerFilter},
        models::villagers::VillagerCreateDBRequest,
    },
    errors::{Error, Result},
    types::VillagerId,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use sqlx::Acquire;

/// Query the upstream catalog by species and, optionally, personality.
///
/// Every call fetches the full upstream list; nothing is read from or written to the database.
#[utoipa::path(
    get,
    path = "/villagers",
    tag = "villagers",
    summary = "Query villagers",
    params(VillagerQuery),
    responses(
        (status = 200, description = "Villagers matching the filters", body = Vec<VillagerResponse>),
        (status = 400, description = "Unknown species or personality"),
        (status = 502, description = "Catalog API unavailable"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn query_villagers(State(state): State<AppState>, Query(query): Query<VillagerQuery>) -> Result<Json<Vec<VillagerResponse>>> {
    let records = state.catalog.fetch_villagers().await?;
    let villagers = filter_villagers(records, query.species, query.personality)
        .into_iter()
        .map(VillagerResponse::from)
        .collect();

    Ok(Json(villagers))
}

#[utoipa::path(
    post,
    path = "/add_villagers",
    tag = "catalog",
    summary = "Mirror upstream villagers",
    description = "Fetch every villager from the catalog API and store the ones not already present. \
                   Stored villagers are never updated.",
    responses(
        (status = 200, description = "Villagers synced", body = SyncResponse),
        (status = 502, description = "Catalog API unavailable"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn sync_villagers(State(state): State<AppState>) -> Result<Json<SyncResponse>> {
    let records = state.catalog.fetch_villagers().await?;
    let fetched = records.len();
    let requests: Vec<VillagerCreateDBRequest> = records.into_iter().map(Into::into).collect();

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let (inserted, stored) = {
        let mut repo = Villagers::new(tx.acquire().await.map_err(|e| Error::Database(e.into()))?);
        let inserted = repo.insert_many_if_absent(&requests).await?;
        (inserted, repo.count().await?)
    };
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    tracing::info!("Mirrored villagers: {} fetched, {} new, {} stored", fetched, inserted, stored);

    Ok(Json(SyncResponse {
        message: "Villagers synced".to_string(),
        fetched,
        inserted,
    }))
}

#[utoipa::path(
    get,
    path = "/catalog/villagers",
    tag = "catalog",
    summary = "List stored villagers",
    params(StoredVillagerQuery),
    responses(
        (status = 200, description = "Villagers in the local mirror", body = Vec<VillagerResponse>),
        (status = 400, description = "Unknown species or personality"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_stored_villagers(
    State(state): State<AppState>,
    Query(query): Query<StoredVillagerQuery>,
) -> Result<Json<Vec<VillagerResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let filter = VillagerFilter {
        species: query.species,
        personality: query.personality,
    };
    let villagers = Villagers::new(&mut pool_conn).list(&filter).await?;

    Ok(Json(villagers.into_iter().map(VillagerResponse::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/catalog/villagers/{villager_id}",
    tag = "catalog",
    summary = "Delete stored villager",
    description = "Remove a villager from the local mirror. Every collection link to it is removed as well.",
    params(
        ("villager_id" = String, Path, description = "Villager ID"),
    ),
    responses(
        (status = 204, description = "Villager deleted"),
        (status = 404, description = "Villager not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_villager(State(state): State<AppState>, Path(villager_id): Path<VillagerId>) -> Result<StatusCode> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    if Villagers::new(&mut pool_conn).delete(&villager_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("Villager", villager_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{catalog::SyncResponse, villagers::VillagerResponse},
        db::handlers::{Collections, Villagers},
        test_utils::*,
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_villagers(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/villagers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_query_villagers_returns_exact_shape(pool: PgPool) {
        let server = MockServer::start().await;
        mock_villagers(
            &server,
            json!([{"id": "cat00", "name": "Bob", "species": "cat", "personality": "lazy", "quote": "..."}]),
        )
        .await;
        let app = create_test_app_with_catalog(pool, &server).await;

        let response = app.get("/villagers?species=cat&personality=lazy").await;
        response.assert_status_ok();
        response.assert_json(&json!([
            {"villager_id": "cat00", "name": "Bob", "species": "cat", "personality": "lazy", "quote": "..."}
        ]));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_query_villagers_filters_case_insensitively(pool: PgPool) {
        let server = MockServer::start().await;
        mock_villagers(
            &server,
            json!([
                {"id": "cat00", "name": "Bob", "species": "Cat", "personality": "Lazy", "quote": "..."},
                {"id": "cat01", "name": "Olivia", "species": "Cat", "personality": "Snooty", "quote": "..."},
                {"id": "bcb00", "name": "Cheri", "species": "Bear cub", "personality": "Peppy", "quote": "..."},
            ]),
        )
        .await;
        let app = create_test_app_with_catalog(pool, &server).await;

        let cats: Vec<VillagerResponse> = app.get("/villagers?species=CAT").await.json();
        let ids: Vec<_> = cats.iter().map(|v| v.villager_id.as_str()).collect();
        assert_eq!(ids, vec!["cat00", "cat01"]);
        assert!(cats.iter().all(|v| v.species == "cat"));

        let cubs: Vec<VillagerResponse> = app.get("/villagers?species=bear%20cub&personality=PEPPY").await.json();
        assert_eq!(cubs.len(), 1);
        assert_eq!(cubs[0].species, "bear cub");
        assert_eq!(cubs[0].personality, "peppy");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_query_villagers_rejects_unknown_species(pool: PgPool) {
        let app = create_test_app(pool).await;

        app.get("/villagers?species=dragon").await.assert_status_bad_request();
        app.get("/villagers").await.assert_status_bad_request();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_query_villagers_propagates_upstream_status(pool: PgPool) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/villagers"))
            .respond_with(ResponseTemplate::new(403).set_body_string("invalid key"))
            .mount(&server)
            .await;
        let app = create_test_app_with_catalog(pool, &server).await;

        let response = app.get("/villagers?species=cat").await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_sync_villagers_is_idempotent(pool: PgPool) {
        let server = MockServer::start().await;
        mock_villagers(
            &server,
            json!([
                {"id": "cat00", "name": "Bob", "species": "Cat", "personality": "Lazy", "quote": "..."},
                {"id": "dog00", "name": "Goldie", "species": "Dog", "personality": "Normal", "quote": "Woof"},
            ]),
        )
        .await;
        let app = create_test_app_with_catalog(pool.clone(), &server).await;

        let first: SyncResponse = app.post("/add_villagers").await.json();
        assert_eq!(first.fetched, 2);
        assert_eq!(first.inserted, 2);

        let second: SyncResponse = app.post("/add_villagers").await.json();
        assert_eq!(second.fetched, 2);
        assert_eq!(second.inserted, 0);

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(Villagers::new(&mut conn).count().await.unwrap(), 2);

        let stored: Vec<VillagerResponse> = app.get("/catalog/villagers?species=cat").await.json();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].villager_id, "cat00");
        assert_eq!(stored[0].species, "cat");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_sync_villagers_propagates_upstream_status(pool: PgPool) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/villagers"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let app = create_test_app_with_catalog(pool.clone(), &server).await;

        app.post("/add_villagers").await.assert_status(StatusCode::UNAUTHORIZED);

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(Villagers::new(&mut conn).count().await.unwrap(), 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_stored_villager_removes_links(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "nook").await;
        create_test_villager(&pool, "cat00").await;

        let mut conn = pool.acquire().await.unwrap();
        Collections::new(&mut conn).add_villager(user.user_id, "cat00").await.unwrap();

        app.delete("/catalog/villagers/cat00").await.assert_status(StatusCode::NO_CONTENT);
        app.delete("/catalog/villagers/cat00").await.assert_status_not_found();

        assert!(Collections::new(&mut conn).list_villagers(user.user_id).await.unwrap().is_empty());
    }
}
