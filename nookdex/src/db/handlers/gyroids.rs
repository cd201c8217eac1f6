//! Database repository for the mirrored gyroid catalog.

use crate::db::{
    errors::Result,
    models::gyroids::{GyroidCreateDBRequest, GyroidDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Gyroids<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Gyroids<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert every gyroid whose name is not stored yet. Returns the number of inserted rows.
    #[instrument(skip(self, requests), fields(count = requests.len()), err)]
    pub async fn insert_many_if_absent(&mut self, requests: &[GyroidCreateDBRequest]) -> Result<u64> {
        if requests.is_empty() {
            return Ok(0);
        }

        let (names, sounds): (Vec<String>, Vec<String>) = requests.iter().map(|r| (r.gyroid_name.clone(), r.sound.clone())).unzip();

        let result = sqlx::query(
            r#"
            INSERT INTO gyroids (gyroid_name, sound)
            SELECT * FROM UNNEST($1::text[], $2::text[])
            ON CONFLICT (gyroid_name) DO NOTHING
            "#,
        )
        .bind(names)
        .bind(sounds)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, gyroid_name: &str) -> Result<Option<GyroidDBResponse>> {
        let gyroid = sqlx::query_as::<_, GyroidDBResponse>("SELECT * FROM gyroids WHERE gyroid_name = $1")
            .bind(gyroid_name)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(gyroid)
    }

    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<GyroidDBResponse>> {
        let gyroids = sqlx::query_as::<_, GyroidDBResponse>("SELECT * FROM gyroids ORDER BY gyroid_name")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(gyroids)
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gyroids").fetch_one(&mut *self.db).await?;
        Ok(count)
    }

    /// Delete a gyroid from the catalog. Collection links to it cascade.
    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, gyroid_name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM gyroids WHERE gyroid_name = $1")
            .bind(gyroid_name)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::gyroid_request;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_insert_many_is_idempotent(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Gyroids::new(&mut conn);

        let batch = vec![gyroid_request("bubbloid"), gyroid_request("clankoid")];
        assert_eq!(repo.insert_many_if_absent(&batch).await.unwrap(), 2);
        assert_eq!(repo.insert_many_if_absent(&batch).await.unwrap(), 0);
        assert_eq!(repo.insert_many_if_absent(&[gyroid_request("bubbloid")]).await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 2);

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|g| g.gyroid_name).collect();
        assert_eq!(names, vec!["bubbloid", "clankoid"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Gyroids::new(&mut conn);

        repo.insert_many_if_absent(&[gyroid_request("bubbloid")]).await.unwrap();
        assert!(repo.delete("bubbloid").await.unwrap());
        assert!(repo.get_by_id("bubbloid").await.unwrap().is_none());
    }
}
