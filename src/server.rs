use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    routing::{get, post},
    Form, Router,
};
use tracing::{info, warn};

use crate::{
    commands::{dispatch, SlashCommand},
    error_handler::send_reply,
    replies::Reply,
    BotState,
};

pub fn create_router(state: Arc<BotState>) -> Router {
    Router::new()
        .route("/api/slash", post(slash_command))
        .route("/health", get(health))
        .with_state(state)
}

/// Slash command webhook. The answer is always an empty `200`: everything the
/// user sees goes through the notifier.
async fn slash_command(
    State(state): State<Arc<BotState>>,
    form: Result<Form<SlashCommand>, FormRejection>,
) -> StatusCode {
    match form {
        Ok(Form(command)) => {
            info!(
                "Request received from {} ({}): {:?}",
                command.user_id,
                command.user_name.as_deref().unwrap_or("?"),
                command.text
            );
            dispatch(&state, command, (state.clock)()).await;
        }

        Err(rejection) => {
            warn!("Could not decode the slash command: {rejection}");
            send_reply(state.notifier.as_ref(), &Reply::Error).await;
        }
    }

    StatusCode::OK
}

async fn health() -> &'static str {
    "ok"
}
