mod schedule;
mod submission;

pub use schedule::{Interval, IntervalResult, TradingSchedule};
pub use submission::{DayKey, Guess, SlotNumber, SubmissionRecord, UserId};
