use std::str::FromStr;

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::{
    commands::{arguments::Prediction, user_err, CommandResult, SlashCommand},
    models::{Guess, IntervalResult, UserId},
    replies::Reply,
    submission_policy::{can_submit, next_slot, Decision, NextSlot},
    BotState,
};

/// Records a guess for the current trading interval.
///
/// Every rejection comes back as `CommandError::User` carrying the reply to
/// post. Nothing is written unless the guess is accepted.
#[tracing::instrument(skip(state))]
pub async fn guess(state: &BotState, command: &SlashCommand, now: OffsetDateTime) -> CommandResult {
    if command.user_id.trim().is_empty() {
        warn!("Slash command without a user id");
        return Err(user_err(Reply::Error));
    }
    let user = UserId(command.user_id.clone());

    let interval = match state.schedule.compute_interval(now) {
        IntervalResult::Open(interval) => interval,

        IntervalResult::Closed => {
            info!("Market is closed");
            return Err(user_err(Reply::MarketClosed { user }));
        }

        IntervalResult::CutoffWindow => {
            info!("No more bets in the last 30 minutes of trading");
            return Err(user_err(Reply::LastThirtyMinutes { user }));
        }
    };

    let value = Prediction::from_str(&command.text)?.value();

    let day = state.schedule.day_key(now);
    let existing = state
        .submission_repository
        .get_submission(&day, &user)
        .await?;

    let slot = next_slot(existing.as_ref());
    debug!("Day {day}, interval {interval}, next slot {slot:?}");

    let slot = match (can_submit(interval, slot, existing.as_ref()), slot) {
        (Decision::Allow, NextSlot::Available(slot)) => slot,
        (Decision::Allow, NextSlot::Full) => return Err(user_err(Reply::PredictionsFull)),
        (Decision::Deny(reason), _) => return Err(user_err(reason.into())),
    };

    state
        .submission_repository
        .merge_guess(&day, &user, slot, Guess { value, interval })
        .await?;

    info!("Accepted guess {value} for interval {interval} in slot {slot}");
    Ok(Reply::PredictionReceived { value, interval })
}
