//! Test doubles: in-memory collaborators for the command handler and local
//! HTTP stand-ins for the table service and the Slack API.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    http::{HeaderMap, Method, StatusCode, Uri},
    Router,
};
use time::macros::datetime;
use tokio::net::TcpListener;

use crate::{
    models::{DayKey, Guess, SlotNumber, SubmissionRecord, TradingSchedule, UserId},
    notifier::{Notifier, NotifierError},
    replies::Reply,
    repository::{StoreError, SubmissionStore},
    BotState,
};

/// State with the default schedule and a clock stuck 15 minutes after the open.
pub fn bot_state(store: Arc<MemoryStore>, notifier: Arc<RecordingNotifier>) -> BotState {
    BotState {
        schedule: TradingSchedule::default(),
        submission_repository: store,
        notifier,
        clock: || datetime!(2026-10-19 14:45:00 UTC),
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(DayKey, UserId), SubmissionRecord>>,
    reads: Mutex<usize>,
    writes: Mutex<usize>,
    failing: bool,
    failing_writes: bool,
}

impl MemoryStore {
    pub fn with_records(records: impl IntoIterator<Item = SubmissionRecord>) -> MemoryStore {
        let records = records
            .into_iter()
            .map(|record| ((record.day.clone(), record.user.clone()), record))
            .collect();

        MemoryStore {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn failing() -> MemoryStore {
        MemoryStore {
            failing: true,
            ..Default::default()
        }
    }

    /// Reads succeed, every write fails.
    pub fn failing_writes(records: impl IntoIterator<Item = SubmissionRecord>) -> MemoryStore {
        MemoryStore {
            failing_writes: true,
            ..MemoryStore::with_records(records)
        }
    }

    pub fn record(&self, day: &DayKey, user: &UserId) -> Option<SubmissionRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&(day.clone(), user.clone()))
            .cloned()
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn unavailable() -> StoreError {
        StoreError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "store unavailable".to_owned(),
        }
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn get_submission(
        &self,
        day: &DayKey,
        user: &UserId,
    ) -> Result<Option<SubmissionRecord>, StoreError> {
        *self.reads.lock().unwrap() += 1;

        if self.failing {
            return Err(MemoryStore::unavailable());
        }

        Ok(self.record(day, user))
    }

    async fn merge_guess(
        &self,
        day: &DayKey,
        user: &UserId,
        slot: SlotNumber,
        guess: Guess,
    ) -> Result<(), StoreError> {
        if self.failing || self.failing_writes {
            return Err(MemoryStore::unavailable());
        }

        *self.writes.lock().unwrap() += 1;
        self.records
            .lock()
            .unwrap()
            .entry((day.clone(), user.clone()))
            .or_insert_with(|| SubmissionRecord::new(day.clone(), user.clone()))
            .set_slot(slot, guess);

        Ok(())
    }
}

/// Keeps every reply it was asked to send, whether or not sending "succeeds".
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn failing() -> RecordingNotifier {
        RecordingNotifier {
            failing: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, reply: &Reply) -> Result<(), NotifierError> {
        self.sent.lock().unwrap().push(reply.to_string());

        if self.failing {
            return Err(NotifierError::Rejected("not_authed".to_owned()));
        }

        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Request body should be JSON")
    }
}

/// Answers every request with the same canned response and records what it got.
pub struct FakeService {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeService {
    pub async fn start(status: StatusCode, response_body: &'static str) -> FakeService {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let app = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
                let recorded = recorded.clone();
                async move {
                    recorded.lock().unwrap().push(RecordedRequest {
                        method,
                        uri,
                        headers,
                        body,
                    });
                    (status, response_body)
                }
            },
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        FakeService {
            url: format!("http://{address}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}
