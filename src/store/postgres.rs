use async_trait::async_trait;
use sqlx::{Acquire, Executor, Pool, Postgres, Row};

use super::Storage;
use crate::error::Error;

type Database = Postgres;

/// Postgres-backed storage, one row per collection key.
#[derive(Debug)]
pub struct PgStore {
    pool: Pool<Database>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip_all)]
    pub async fn new(pool: Pool<Database>) -> Result<Self, Error> {
        // collections are kept as text so a malformed payload can still be read back
        pool.execute(
            "CREATE TABLE IF NOT EXISTS collections (key VARCHAR PRIMARY KEY, data TEXT NOT NULL)",
        )
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Storage for PgStore {
    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM collections WHERE key = $1").bind(key))
            .await?;

        match maybe_result {
            Some(result) => Ok(Some(result.try_get("data")?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, entries), fields(len = entries.len()))]
    async fn set_many(&self, entries: &[(&'static str, String)]) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        for (key, data) in entries {
            tx.execute(
                sqlx::query(
                    "INSERT INTO collections (key, data) VALUES ($1, $2) ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data",
                )
                .bind(*key)
                .bind(data.as_str()),
            )
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
