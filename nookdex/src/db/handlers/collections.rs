//! Database repository for user collections.
//!
//! Collections are the two link tables `user_villagers` and `user_gyroids`. Each link is keyed by
//! the (user, collectible) pair, so adding an existing link is a no-op. Removing a link never
//! touches the catalog row it points at.
//!
//! The repository does not check that the user or collectible exist: callers validate that up
//! front so they can report which entity is missing. A link to a missing entity is still rejected
//! by the foreign keys.

use crate::db::{
    errors::Result,
    models::collections::{CollectedGyroidDBResponse, CollectedVillagerDBResponse},
};
use crate::types::UserId;
use sqlx::{Connection, PgConnection};
use tracing::instrument;

pub struct Collections<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Collections<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    // Villager links

    /// Link a villager to a user. Returns `false` if the link already existed.
    #[instrument(skip(self), err)]
    pub async fn add_villager(&mut self, user_id: UserId, villager_id: &str) -> Result<bool> {
        let result = sqlx::query("INSERT INTO user_villagers (user_id, villager_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(villager_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Unlink a villager from a user. Returns `false` if there was no such link.
    #[instrument(skip(self), err)]
    pub async fn remove_villager(&mut self, user_id: UserId, villager_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_villagers WHERE user_id = $1 AND villager_id = $2")
            .bind(user_id)
            .bind(villager_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the `old` villager link with a link to `new` in a single transaction.
    ///
    /// A missing `old` link is not an error; the `new` link is created either way.
    #[instrument(skip(self), err)]
    pub async fn switch_villager(&mut self, user_id: UserId, old_villager_id: &str, new_villager_id: &str) -> Result<()> {
        let mut tx = self.db.begin().await?;
        {
            let mut repo = Collections::new(&mut *tx);
            repo.remove_villager(user_id, old_villager_id).await?;
            repo.add_villager(user_id, new_villager_id).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn list_villagers(&mut self, user_id: UserId) -> Result<Vec<CollectedVillagerDBResponse>> {
        let villagers = sqlx::query_as::<_, CollectedVillagerDBResponse>(
            r#"
            SELECT v.villager_id, v.name, v.species, v.personality, v.quote, uv.added_at
            FROM villagers v
            INNER JOIN user_villagers uv ON v.villager_id = uv.villager_id
            WHERE uv.user_id = $1
            ORDER BY v.villager_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(villagers)
    }

    // Gyroid links

    /// Link a gyroid to a user. Returns `false` if the link already existed.
    #[instrument(skip(self), err)]
    pub async fn add_gyroid(&mut self, user_id: UserId, gyroid_name: &str) -> Result<bool> {
        let result = sqlx::query("INSERT INTO user_gyroids (user_id, gyroid_name) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(gyroid_name)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Unlink a gyroid from a user. Returns `false` if there was no such link.
    #[instrument(skip(self), err)]
    pub async fn remove_gyroid(&mut self, user_id: UserId, gyroid_name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_gyroids WHERE user_id = $1 AND gyroid_name = $2")
            .bind(user_id)
            .bind(gyroid_name)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    pub async fn list_gyroids(&mut self, user_id: UserId) -> Result<Vec<CollectedGyroidDBResponse>> {
        let gyroids = sqlx::query_as::<_, CollectedGyroidDBResponse>(
            r#"
            SELECT g.gyroid_name, g.sound, ug.added_at
            FROM gyroids g
            INNER JOIN user_gyroids ug ON g.gyroid_name = ug.gyroid_name
            WHERE ug.user_id = $1
            ORDER BY g.gyroid_name
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(gyroids)
    }

    /// Remove every link owned by a user. Returns the number of (villager, gyroid) links removed.
    #[instrument(skip(self), err)]
    pub async fn remove_all_for_user(&mut self, user_id: UserId) -> Result<(u64, u64)> {
        let villagers = sqlx::query("DELETE FROM user_villagers WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *self.db)
            .await?
            .rows_affected();

        let gyroids = sqlx::query("DELETE FROM user_gyroids WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *self.db)
            .await?
            .rows_affected();

        Ok((villagers, gyroids))
    }
}
