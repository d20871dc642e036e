use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode};
use tracing::debug;
use url::{ParseError, Url};

use crate::models::{DayKey, Guess, SlotNumber, SubmissionRecord, UserId};

use super::{
    conversion::{DBConvertible, SubmissionEntity},
    StoreError, SubmissionStore,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const STORAGE_API_VERSION: &str = "2019-02-02";
const JSON_NO_METADATA: &str = "application/json;odata=nometadata";

/// Guesses kept in an Azure storage table, one entity per day and user.
#[derive(Debug)]
pub struct TableRepository {
    client: Client,
    endpoint: Url,
    table: String,
    sas_query: String,
}

impl TableRepository {
    pub fn new(endpoint: &str, table: &str, sas_token: &str) -> Result<TableRepository, StoreError> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        let endpoint = Url::parse(endpoint)?;
        if endpoint.cannot_be_a_base() {
            return Err(ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        Ok(TableRepository {
            client,
            endpoint,
            table: table.to_owned(),
            sas_query: sas_token.trim_start_matches('?').to_owned(),
        })
    }

    pub fn account_endpoint(account: &str) -> String {
        format!("https://{account}.table.core.windows.net")
    }

    /// The entity address is a single path segment, so anything in the keys
    /// that would end the path (`/`, `?`, `#`) is percent-encoded.
    fn entity_url(&self, day: &DayKey, user: &UserId) -> Result<Url, StoreError> {
        let segment = format!(
            "{}(PartitionKey='{}',RowKey='{}')",
            self.table,
            escape_key(&day.0),
            escape_key(&user.0)
        );

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(&segment);

        if !self.sas_query.is_empty() {
            url.set_query(Some(&self.sas_query));
        }

        Ok(url)
    }
}

/// OData string literals escape a single quote by doubling it.
fn escape_key(key: &str) -> String {
    key.replace('\'', "''")
}

#[async_trait]
impl SubmissionStore for TableRepository {
    #[tracing::instrument(skip(self))]
    async fn get_submission(
        &self,
        day: &DayKey,
        user: &UserId,
    ) -> Result<Option<SubmissionRecord>, StoreError> {
        let response = self
            .client
            .get(self.entity_url(day, user)?)
            .header(ACCEPT, JSON_NO_METADATA)
            .header("x-ms-version", STORAGE_API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No guesses stored yet");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        let entity: SubmissionEntity = response.json().await?;
        Ok(Some(SubmissionRecord::from_db(&entity)?))
    }

    #[tracing::instrument(skip(self))]
    async fn merge_guess(
        &self,
        day: &DayKey,
        user: &UserId,
        slot: SlotNumber,
        guess: Guess,
    ) -> Result<(), StoreError> {
        let entity = SubmissionEntity::for_guess(day, user, slot, &guess)?;

        // Insert Or Merge: PATCH without If-Match.
        let response = self
            .client
            .patch(self.entity_url(day, user)?)
            .header(ACCEPT, JSON_NO_METADATA)
            .header("x-ms-version", STORAGE_API_VERSION)
            .json(&entity)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }

        debug!("Stored guess in slot {slot}");
        Ok(())
    }
}
