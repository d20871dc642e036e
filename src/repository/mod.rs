mod conversion;
mod sqlite_repository;
mod table_repository;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DayKey, Guess, SlotNumber, SubmissionRecord, UserId};

pub use conversion::{DBFromConversionError, DBToConversionError};
pub use sqlite_repository::SqliteRepository;
pub use table_repository::TableRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid table URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Table service responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Could not run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Could not read a stored submission: {0}")]
    FromConversion(#[from] DBFromConversionError),
    #[error("Could not convert a submission for storage: {0}")]
    ToConversion(#[from] DBToConversionError),
}

/// Daily guesses keyed by trading day and user.
///
/// Reads and writes are not atomic together: two requests from the same user
/// racing on the same day can both see the same free slot.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Returns `None` when the user has not guessed on `day` yet.
    async fn get_submission(
        &self,
        day: &DayKey,
        user: &UserId,
    ) -> Result<Option<SubmissionRecord>, StoreError>;

    /// Writes one slot, creating the record if needed and leaving other slots untouched.
    async fn merge_guess(
        &self,
        day: &DayKey,
        user: &UserId,
        slot: SlotNumber,
        guess: Guess,
    ) -> Result<(), StoreError>;
}
