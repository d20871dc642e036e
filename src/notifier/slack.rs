use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::replies::Reply;

use super::{Notifier, NotifierError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Sends replies with `chat.postMessage` to a fixed channel.
pub struct SlackNotifier {
    client: Client,
    api_base: String,
    channel: String,
    token: String,
}

impl SlackNotifier {
    pub fn new(
        api_base: &str,
        channel: &str,
        bearer_token: &str,
    ) -> Result<SlackNotifier, NotifierError> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(SlackNotifier {
            client,
            api_base: api_base.trim_end_matches('/').to_owned(),
            channel: channel.to_owned(),
            token: strip_bearer(bearer_token).to_owned(),
        })
    }
}

/// Accepts tokens configured both as `xoxb-...` and as `Bearer xoxb-...`.
fn strip_bearer(token: &str) -> &str {
    let token = token.trim();
    token
        .strip_prefix("Bearer ")
        .map(str::trim_start)
        .unwrap_or(token)
}

#[async_trait]
impl Notifier for SlackNotifier {
    #[tracing::instrument(skip(self))]
    async fn notify(&self, reply: &Reply) -> Result<(), NotifierError> {
        let text = reply.to_string();

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.token)
            .json(&PostMessage {
                channel: &self.channel,
                text: &text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifierError::Status { status, body });
        }

        let body: PostMessageResponse = response.json().await?;
        debug!("chat.postMessage response: {body:?}");

        if !body.ok {
            return Err(NotifierError::Rejected(
                body.error.unwrap_or_else(|| "unknown error".to_owned()),
            ));
        }

        info!("Message posted successfully, status: {status}");
        Ok(())
    }
}
