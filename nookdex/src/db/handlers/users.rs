//! Database repository for users.

use crate::db::{
    errors::{DbError, Result},
    handlers::{collections::Collections, repository::Repository},
    models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
};
use crate::types::UserId;
use sqlx::{Connection, PgConnection};
use tracing::instrument;

/// Filter for listing users
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>, // Case-insensitive substring search on username
}

impl UserFilter {
    pub fn with_search(mut self, search: String) -> Self {
        self.search = Some(search);
        self
    }
}

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type UpdateRequest = UserUpdateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = UserFilter;

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let user = match request.user_id {
            Some(user_id) => {
                let mut tx = self.db.begin().await?;

                let user = sqlx::query_as::<_, UserDBResponse>(
                    r#"
                    INSERT INTO users (user_id, username, native_fruit)
                    VALUES ($1, $2, $3)
                    RETURNING *
                    "#,
                )
                .bind(user_id)
                .bind(&request.username)
                .bind(&request.native_fruit)
                .fetch_one(&mut *tx)
                .await?;

                // Explicit ids bypass the identity sequence, so move it past the highest id in use
                sqlx::query(
                    r#"
                    SELECT setval(
                        pg_get_serial_sequence('users', 'user_id'),
                        GREATEST((SELECT MAX(user_id) FROM users), 1)
                    )
                    "#,
                )
                .execute(&mut *tx)
                .await?;

                tx.commit().await?;
                user
            }
            None => {
                sqlx::query_as::<_, UserDBResponse>(
                    r#"
                    INSERT INTO users (username, native_fruit)
                    VALUES ($1, $2)
                    RETURNING *
                    "#,
                )
                .bind(&request.username)
                .bind(&request.native_fruit)
                .fetch_one(&mut *self.db)
                .await?
            }
        };

        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let users = sqlx::query_as::<_, UserDBResponse>(
            r#"
            SELECT * FROM users
            WHERE ($1::text IS NULL OR username ILIKE '%' || $1 || '%')
            ORDER BY user_id
            "#,
        )
        .bind(filter.search.as_deref())
        .fetch_all(&mut *self.db)
        .await?;

        Ok(users)
    }

    /// Deletes the user together with every collection link they own.
    ///
    /// The link tables cascade on delete as well, but the links are removed explicitly in the
    /// same transaction so the cleanup does not depend on the schema.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        let (villagers, gyroids) = Collections::new(&mut *tx).remove_all_for_user(id).await?;
        tracing::debug!("Removed {} villager and {} gyroid links for user {}", villagers, gyroids, id);

        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let user = sqlx::query_as::<_, UserDBResponse>(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                native_fruit = COALESCE($3, native_fruit),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.username.as_deref())
        .bind(request.native_fruit.as_deref())
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(user)
    }
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Whether a user with this ID exists
    #[instrument(skip(self), err)]
    pub async fn exists(&mut self, id: UserId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
            .bind(id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Gyroids, Villagers};
    use crate::test_utils::{gyroid_request, villager_request};
    use sqlx::PgPool;

    fn user_request(username: &str) -> UserCreateDBRequest {
        UserCreateDBRequest {
            user_id: None,
            username: username.to_string(),
            native_fruit: "Apple".to_string(),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_user(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let user = repo.create(&user_request("isabelle")).await.unwrap();
        assert_eq!(user.username, "isabelle");
        assert_eq!(user.native_fruit, "Apple");

        let fetched = repo.get_by_id(user.user_id).await.unwrap().unwrap();
        assert_eq!(fetched.user_id, user.user_id);
        assert!(repo.exists(user.user_id).await.unwrap());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_user_with_explicit_id(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let request = UserCreateDBRequest {
            user_id: Some(42),
            ..user_request("tom")
        };
        let user = repo.create(&request).await.unwrap();
        assert_eq!(user.user_id, 42);

        let err = repo.create(&request).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_generated_id_skips_explicit_ids(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        for user_id in [1, 2] {
            repo.create(&UserCreateDBRequest {
                user_id: Some(user_id),
                ..user_request("tommy")
            })
            .await
            .unwrap();
        }

        let generated = repo.create(&user_request("timmy")).await.unwrap();
        assert_eq!(generated.user_id, 3);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_users_with_search(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        for name in ["Timmy", "Tommy", "Blathers"] {
            repo.create(&user_request(name)).await.unwrap();
        }

        let all = repo.list(&UserFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let found = repo.list(&UserFilter::default().with_search("MMY".to_string())).await.unwrap();
        let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["Timmy", "Tommy"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_user(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let user = repo.create(&user_request("redd")).await.unwrap();
        let updated = repo
            .update(
                user.user_id,
                &UserUpdateDBRequest {
                    username: Some("crazy redd".to_string()),
                    native_fruit: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username, "crazy redd");
        assert_eq!(updated.native_fruit, "Apple");

        let err = repo
            .update(
                user.user_id + 1000,
                &UserUpdateDBRequest {
                    username: Some("nobody".to_string()),
                    native_fruit: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_user_removes_links_but_not_catalog(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();

        Villagers::new(&mut conn).insert_many_if_absent(&[villager_request("cat00", "cat", "lazy")]).await.unwrap();
        Gyroids::new(&mut conn).insert_many_if_absent(&[gyroid_request("bubbloid")]).await.unwrap();

        let user = Users::new(&mut conn).create(&user_request("nook")).await.unwrap();
        let mut collections = Collections::new(&mut conn);
        collections.add_villager(user.user_id, "cat00").await.unwrap();
        collections.add_gyroid(user.user_id, "bubbloid").await.unwrap();

        assert!(Users::new(&mut conn).delete(user.user_id).await.unwrap());
        assert!(!Users::new(&mut conn).delete(user.user_id).await.unwrap());

        let mut collections = Collections::new(&mut conn);
        assert!(collections.list_villagers(user.user_id).await.unwrap().is_empty());
        assert!(collections.list_gyroids(user.user_id).await.unwrap().is_empty());

        assert!(Villagers::new(&mut conn).get_by_id("cat00").await.unwrap().is_some());
        assert!(Gyroids::new(&mut conn).get_by_id("bubbloid").await.unwrap().is_some());
    }
}
