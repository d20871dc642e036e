use std::fmt::Display;

use time::{OffsetDateTime, Time, UtcOffset};

use crate::utils::formatting::format_day_key;

use super::DayKey;

/// Length of one betting interval.
const INTERVAL_MINUTES: i64 = 60;
/// Number of betting intervals in a trading day.
const INTERVAL_COUNT: u8 = 6;
/// Minutes after the open during which guesses are accepted.
const BETTING_MINUTES: i64 = INTERVAL_MINUTES * INTERVAL_COUNT as i64;
/// Minutes after the open when the market closes.
const SESSION_MINUTES: i64 = 390;

/// A betting interval of the trading day.
///
/// Intervals count down as the day progresses: the first hour after the open is
/// interval 6, the last betting hour is interval 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval(u8);

impl Interval {
    pub fn new(number: u8) -> Option<Interval> {
        (1..=INTERVAL_COUNT)
            .contains(&number)
            .then_some(Interval(number))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntervalResult {
    /// Before the open or after the close.
    Closed,
    /// The last 30 minutes of trading, when no guesses are taken.
    CutoffWindow,
    Open(Interval),
}

/// Opening time of the market and the UTC offset it is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TradingSchedule {
    open: Time,
    offset: UtcOffset,
}

impl Default for TradingSchedule {
    fn default() -> Self {
        TradingSchedule {
            open: time::macros::time!(14:30),
            offset: UtcOffset::UTC,
        }
    }
}

impl TradingSchedule {
    pub fn new(open: Time, offset: UtcOffset) -> TradingSchedule {
        TradingSchedule { open, offset }
    }

    /// The opening moment of the trading day `now` falls on.
    pub fn market_open(&self, now: OffsetDateTime) -> OffsetDateTime {
        now.to_offset(self.offset).replace_time(self.open)
    }

    /// Whole minutes since the open, rounded to the nearest minute with halves going up.
    pub fn elapsed_minutes(&self, now: OffsetDateTime) -> i64 {
        let elapsed = now - self.market_open(now);
        let minutes = elapsed.whole_milliseconds() as f64 / 60_000.0;
        (minutes + 0.5).floor() as i64
    }

    pub fn compute_interval(&self, now: OffsetDateTime) -> IntervalResult {
        interval_for_elapsed(self.elapsed_minutes(now))
    }

    pub fn day_key(&self, now: OffsetDateTime) -> DayKey {
        DayKey(format_day_key(now.to_offset(self.offset)))
    }
}

/// Maps minutes since the open onto the trading day.
///
/// A boundary minute belongs to the interval that is ending, so minute 60 is
/// still interval 6 and minute 61 is interval 5.
pub fn interval_for_elapsed(elapsed_minutes: i64) -> IntervalResult {
    match elapsed_minutes {
        minutes if minutes < 0 => IntervalResult::Closed,

        minutes if minutes <= BETTING_MINUTES => {
            let passed = ((minutes - 1).max(0) / INTERVAL_MINUTES) as u8;
            IntervalResult::Open(Interval(INTERVAL_COUNT - passed))
        }

        minutes if minutes <= SESSION_MINUTES => IntervalResult::CutoffWindow,

        _ => IntervalResult::Closed,
    }
}
