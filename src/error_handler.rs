use tracing::{error, info};

use crate::{commands::CommandError, notifier::Notifier, replies::Reply};

/// Turns a failed command into the reply the user gets.
pub fn handle_error(error: CommandError) -> Reply {
    match error {
        CommandError::User(reply) => {
            info!("Guess rejected: {reply}");
            reply
        }

        CommandError::Store(error) => {
            error!("Submission store error: {error:?}");
            Reply::Error
        }
    }
}

/// Sends a reply. A failure here is only logged since there is no other way to reach the user.
pub async fn send_reply(notifier: &dyn Notifier, reply: &Reply) {
    if let Err(send_error) = notifier.notify(reply).await {
        error!(
            "Failed to send a message to the user: {}\nThe message was: {}",
            send_error, reply
        );
    }
}
