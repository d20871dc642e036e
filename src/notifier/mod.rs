mod slack;

use async_trait::async_trait;
use thiserror::Error;

use crate::replies::Reply;

pub use slack::{SlackNotifier, SLACK_API_BASE};

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Message request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Chat API responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Chat API rejected the message: {0}")]
    Rejected(String),
}

/// Posts replies to the bot's channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, reply: &Reply) -> Result<(), NotifierError>;
}
