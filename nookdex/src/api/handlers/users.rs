use crate::{
    AppState,
    api::models::users::{ListUsersQuery, UserCreate, UserResponse, UserUpdate},
    db::{
        errors::DbError,
        handlers::{Repository, Users, users::UserFilter},
        models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{NATIVE_FRUITS, UserId, canonical_fruit},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "username must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_fruit(fruit: &str) -> Result<&'static str> {
    canonical_fruit(fruit).ok_or_else(|| Error::BadRequest {
        message: format!("native_fruit must be one of: {}", NATIVE_FRUITS.join(", ")),
    })
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    summary = "List users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "All users, ordered by ID", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(State(state): State<AppState>, Query(query): Query<ListUsersQuery>) -> Result<Json<Vec<UserResponse>>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Users::new(&mut pool_conn);

    let mut filter = UserFilter::default();
    if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
        filter = filter.with_search(search.trim().to_string());
    }

    let users = repo.list(&filter).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    summary = "Create user",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid username or native fruit"),
        (status = 409, description = "A user with this ID already exists"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(State(state): State<AppState>, Json(create): Json<UserCreate>) -> Result<(StatusCode, Json<UserResponse>)> {
    validate_username(&create.username)?;
    let fruit = validate_fruit(&create.native_fruit)?;

    let mut request = UserCreateDBRequest::from(create);
    request.native_fruit = fruit.to_string();

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut pool_conn).create(&request).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "users",
    summary = "Get user",
    params(
        ("user_id" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_user(State(state): State<AppState>, Path(user_id): Path<UserId>) -> Result<Json<UserResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut pool_conn)
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))?;

    Ok(Json(UserResponse::from(user)))
}

/// Rename a user or change their native fruit. Omitted fields are left unchanged.
#[utoipa::path(
    patch,
    path = "/users/{user_id}",
    tag = "users",
    summary = "Update user",
    request_body = UserUpdate,
    params(
        ("user_id" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid username or native fruit"),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<UserResponse>> {
    if let Some(username) = &update.username {
        validate_username(username)?;
    }
    let fruit = update.native_fruit.as_deref().map(validate_fruit).transpose()?;

    let mut request = UserUpdateDBRequest::from(update);
    request.native_fruit = fruit.map(str::to_string);

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    match Users::new(&mut pool_conn).update(user_id, &request).await {
        Ok(user) => Ok(Json(UserResponse::from(user))),
        Err(DbError::NotFound) => Err(Error::not_found("User", user_id)),
        Err(e) => Err(e.into()),
    }
}

/// Delete a user and every villager and gyroid in their collection.
///
/// Catalog entries are shared between users and are left in place.
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "users",
    summary = "Delete user",
    params(
        ("user_id" = i64, Path, description = "User ID"),
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_user(State(state): State<AppState>, Path(user_id): Path<UserId>) -> Result<StatusCode> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    if Users::new(&mut pool_conn).delete(user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("User", user_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::{api::models::users::UserResponse, db::handlers::Collections, test_utils::*};
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_get_user(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app
            .post("/users")
            .json(&json!({"username": "  Isabelle ", "native_fruit": "cherry"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let user: UserResponse = response.json();
        assert_eq!(user.username, "Isabelle");
        assert_eq!(user.native_fruit, "Cherry");

        let fetched: UserResponse = app.get(&format!("/users/{}", user.user_id)).await.json();
        assert_eq!(fetched.user_id, user.user_id);
        assert_eq!(fetched.username, "Isabelle");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_user_with_explicit_id_conflicts(pool: PgPool) {
        let app = create_test_app(pool).await;
        let body = json!({"user_id": 7, "username": "tom", "native_fruit": "Pear"});

        let user: UserResponse = app.post("/users").json(&body).await.json();
        assert_eq!(user.user_id, 7);

        let response = app.post("/users").json(&body).await;
        response.assert_status(StatusCode::CONFLICT);
        response.assert_json(&json!({"detail": "A user with this ID already exists"}));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_user_without_id_after_explicit_id(pool: PgPool) {
        let app = create_test_app(pool).await;

        app.post("/users")
            .json(&json!({"user_id": 1, "username": "tom", "native_fruit": "Pear"}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = app
            .post("/users")
            .json(&json!({"username": "isabelle", "native_fruit": "Apple"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let user: UserResponse = response.json();
        assert_eq!(user.user_id, 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_user_validation(pool: PgPool) {
        let app = create_test_app(pool).await;

        app.post("/users")
            .json(&json!({"username": "   ", "native_fruit": "Apple"}))
            .await
            .assert_status_bad_request();
        app.post("/users")
            .json(&json!({"username": "tom", "native_fruit": "Durian"}))
            .await
            .assert_status_bad_request();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_users_with_search(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        for name in ["Timmy", "Tommy", "Blathers"] {
            create_test_user(&pool, name).await;
        }

        let all: Vec<UserResponse> = app.get("/users").await.json();
        assert_eq!(all.len(), 3);

        let found: Vec<UserResponse> = app.get("/users?search=blath").await.json();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "Blathers");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_rename_user(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "redd").await;

        let updated: UserResponse = app
            .patch(&format!("/users/{}", user.user_id))
            .json(&json!({"username": "Crazy Redd"}))
            .await
            .json();
        assert_eq!(updated.username, "Crazy Redd");
        assert_eq!(updated.native_fruit, user.native_fruit);

        app.patch(&format!("/users/{}", user.user_id))
            .json(&json!({"username": ""}))
            .await
            .assert_status_bad_request();

        let response = app.patch("/users/999999").json(&json!({"username": "nobody"})).await;
        response.assert_status_not_found();
        response.assert_json(&json!({"detail": "User with ID 999999 not found"}));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_user_removes_collection(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "nook").await;
        create_test_villager(&pool, "cat00").await;
        create_test_gyroid(&pool, "Babbloid").await;

        app.post(&format!("/users/{}/villagers/cat00", user.user_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        app.post(&format!("/users/{}/gyroids/Babbloid", user.user_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        app.delete(&format!("/users/{}", user.user_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        app.get(&format!("/users/{}", user.user_id)).await.assert_status_not_found();
        app.delete(&format!("/users/{}", user.user_id)).await.assert_status_not_found();

        let mut conn = pool.acquire().await.unwrap();
        let mut collections = Collections::new(&mut conn);
        assert!(collections.list_villagers(user.user_id).await.unwrap().is_empty());
        assert!(collections.list_gyroids(user.user_id).await.unwrap().is_empty());

        let stored: Vec<serde_json::Value> = app.get("/catalog/villagers").await.json();
        assert_eq!(stored.len(), 1);
    }
}
