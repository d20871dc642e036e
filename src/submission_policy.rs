//! Quota rules for daily guesses.
//!
//! A user gets three guesses per trading day and at most one per interval.

use strum::IntoEnumIterator;

use crate::models::{Interval, SlotNumber, SubmissionRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextSlot {
    Available(SlotNumber),
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    PredictionsFull,
    AlreadySubmittedThisInterval,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// The slot the next guess would occupy.
pub fn next_slot(existing: Option<&SubmissionRecord>) -> NextSlot {
    let Some(record) = existing else {
        return NextSlot::Available(SlotNumber::One);
    };

    SlotNumber::iter()
        .find(|slot| record.slot(*slot).is_none())
        .map(NextSlot::Available)
        .unwrap_or(NextSlot::Full)
}

pub fn can_submit(
    interval: Interval,
    next_slot: NextSlot,
    existing: Option<&SubmissionRecord>,
) -> Decision {
    if next_slot == NextSlot::Full {
        return Decision::Deny(DenyReason::PredictionsFull);
    }

    // Intervals only count down during a day, so a repeat can only be the
    // previous slot. Checking all of them also covers schedule changes.
    let repeated = existing
        .into_iter()
        .flat_map(|record| record.filled_slots())
        .any(|(_, guess)| guess.interval == interval);

    if repeated {
        Decision::Deny(DenyReason::AlreadySubmittedThisInterval)
    } else {
        Decision::Allow
    }
}
