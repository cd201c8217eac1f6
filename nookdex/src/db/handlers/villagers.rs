//! Database repository for the mirrored villager catalog.

use crate::db::{
    errors::Result,
    models::villagers::{VillagerCreateDBRequest, VillagerDBResponse},
};
use crate::types::{Personality, Species};
use sqlx::PgConnection;
use tracing::instrument;

/// Filter for listing mirrored villagers
#[derive(Debug, Clone, Default)]
pub struct VillagerFilter {
    pub species: Option<Species>,
    pub personality: Option<Personality>,
}

pub struct Villagers<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Villagers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert every villager whose `villager_id` is not stored yet. Existing rows are never updated.
    ///
    /// Returns the number of inserted rows.
    #[instrument(skip(self, requests), fields(count = requests.len()), err)]
    pub async fn insert_many_if_absent(&mut self, requests: &[VillagerCreateDBRequest]) -> Result<u64> {
        if requests.is_empty() {
            return Ok(0);
        }

        let mut ids = Vec::with_capacity(requests.len());
        let mut names = Vec::with_capacity(requests.len());
        let mut species = Vec::with_capacity(requests.len());
        let mut personalities = Vec::with_capacity(requests.len());
        let mut quotes = Vec::with_capacity(requests.len());
        for request in requests {
            ids.push(request.villager_id.clone());
            names.push(request.name.clone());
            species.push(request.species.clone());
            personalities.push(request.personality.clone());
            quotes.push(request.quote.clone());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO villagers (villager_id, name, species, personality, quote)
            SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::text[], $5::text[])
            ON CONFLICT (villager_id) DO NOTHING
            "#,
        )
        .bind(ids)
        .bind(names)
        .bind(species)
        .bind(personalities)
        .bind(quotes)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, villager_id: &str) -> Result<Option<VillagerDBResponse>> {
        let villager = sqlx::query_as::<_, VillagerDBResponse>("SELECT * FROM villagers WHERE villager_id = $1")
            .bind(villager_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(villager)
    }

    #[instrument(skip(self, filter), err)]
    pub async fn list(&mut self, filter: &VillagerFilter) -> Result<Vec<VillagerDBResponse>> {
        let villagers = sqlx::query_as::<_, VillagerDBResponse>(
            r#"
            SELECT * FROM villagers
            WHERE ($1::text IS NULL OR species = $1)
              AND ($2::text IS NULL OR personality = $2)
            ORDER BY villager_id
            "#,
        )
        .bind(filter.species.map(|s| s.as_str()))
        .bind(filter.personality.map(|p| p.as_str()))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(villagers)
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM villagers").fetch_one(&mut *self.db).await?;
        Ok(count)
    }

    /// Delete a villager from the catalog. Collection links to it cascade.
    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, villager_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM villagers WHERE villager_id = $1")
            .bind(villager_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
