use async_trait::async_trait;
use sqlx::{query, query_as, sqlite::SqlitePoolOptions, FromRow, Pool, Sqlite};
use tracing::info;

use crate::models::{DayKey, Guess, SlotNumber, SubmissionRecord, UserId};

use super::{conversion::DBConvertible, StoreError, SubmissionStore};

/// Guesses kept in a local SQLite database, one row per slot.
#[derive(Debug)]
pub struct SqliteRepository {
    pool: Pool<Sqlite>,
}

impl SqliteRepository {
    pub fn new(pool: Pool<Sqlite>) -> SqliteRepository {
        SqliteRepository { pool }
    }

    #[tracing::instrument(skip(url))]
    pub async fn connect(url: &str) -> Result<SqliteRepository, StoreError> {
        info!("Connecting to SQLite database at {url}");
        // A single connection keeps `sqlite::memory:` databases alive between queries.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        info!("Running migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Done!");
        Ok(SqliteRepository::new(pool))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[derive(Debug, FromRow)]
struct SqlPrediction {
    slot: i64,
    value: f64,
    trading_interval: i64,
}

#[async_trait]
impl SubmissionStore for SqliteRepository {
    #[tracing::instrument(skip(self))]
    async fn get_submission(
        &self,
        day: &DayKey,
        user: &UserId,
    ) -> Result<Option<SubmissionRecord>, StoreError> {
        let mut transaction = self.pool.begin().await?;

        let rows = query_as::<_, SqlPrediction>(
            r#"
                SELECT slot, value, trading_interval FROM predictions
                WHERE day_key = $1 AND user_id = $2
                ORDER BY slot
            "#,
        )
        .bind(day.0.as_str())
        .bind(user.0.as_str())
        .fetch_all(&mut *transaction)
        .await?;

        transaction.commit().await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut record = SubmissionRecord::new(day.clone(), user.clone());
        for row in rows {
            let slot = SlotNumber::from_db(&row.slot)?;
            let guess = Guess::from_db(&(row.value, row.trading_interval))?;
            record.set_slot(slot, guess);
        }

        Ok(Some(record))
    }

    #[tracing::instrument(skip(self))]
    async fn merge_guess(
        &self,
        day: &DayKey,
        user: &UserId,
        slot: SlotNumber,
        guess: Guess,
    ) -> Result<(), StoreError> {
        let slot = slot.to_db()?;
        let (value, trading_interval) = guess.to_db()?;

        let mut transaction = self.pool.begin().await?;

        query(
            r#"
                INSERT INTO predictions (day_key, user_id, slot, value, trading_interval)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (day_key, user_id, slot) DO UPDATE
                SET value = excluded.value, trading_interval = excluded.trading_interval
            "#,
        )
        .bind(day.0.as_str())
        .bind(user.0.as_str())
        .bind(slot)
        .bind(value)
        .bind(trading_interval)
        .execute(&mut *transaction)
        .await?;

        transaction.commit().await?;

        Ok(())
    }
}
