mod arguments;
mod guess;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    error_handler::{handle_error, send_reply},
    replies::Reply,
    repository::StoreError,
    BotState,
};

pub use guess::guess;

type CommandResult = Result<Reply, CommandError>;

/// The form Slack posts for a slash command. Fields not listed are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    /// A rejected guess; the reply explains why.
    #[error("{0}")]
    User(Reply),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn user_err(reply: Reply) -> CommandError {
    CommandError::User(reply)
}

/// Runs a slash command to completion and posts exactly one reply for it.
#[tracing::instrument(skip_all, fields(user = %command.user_id))]
pub async fn dispatch(state: &BotState, command: SlashCommand, now: OffsetDateTime) {
    let reply = match guess(state, &command, now).await {
        Ok(reply) => reply,
        Err(error) => handle_error(error),
    };

    send_reply(state.notifier.as_ref(), &reply).await;
}
