use std::fmt::Display;

use strum::{EnumIter, FromRepr, IntoEnumIterator};

use super::schedule::Interval;

/// Partition of the submission table: one trading day.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DayKey(pub String);

/// Chat platform user identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, FromRepr)]
#[repr(u8)]
pub enum SlotNumber {
    One = 1,
    Two = 2,
    Three = 3,
}

impl SlotNumber {
    pub fn get(self) -> u8 {
        self as u8
    }

    fn index(self) -> usize {
        self as usize - 1
    }
}

impl Display for SlotNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// A single prediction and the interval it was made in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Guess {
    pub value: f64,
    pub interval: Interval,
}

/// All guesses of one user on one trading day.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionRecord {
    pub day: DayKey,
    pub user: UserId,
    slots: [Option<Guess>; 3],
}

impl SubmissionRecord {
    pub fn new(day: DayKey, user: UserId) -> SubmissionRecord {
        SubmissionRecord {
            day,
            user,
            slots: [None; 3],
        }
    }

    #[cfg(test)]
    pub fn with_slot(mut self, slot: SlotNumber, guess: Guess) -> SubmissionRecord {
        self.set_slot(slot, guess);
        self
    }

    pub fn slot(&self, slot: SlotNumber) -> Option<&Guess> {
        self.slots[slot.index()].as_ref()
    }

    pub fn set_slot(&mut self, slot: SlotNumber, guess: Guess) {
        self.slots[slot.index()] = Some(guess);
    }

    pub fn filled_slots(&self) -> impl Iterator<Item = (SlotNumber, &Guess)> + '_ {
        SlotNumber::iter().filter_map(|slot| self.slot(slot).map(|guess| (slot, guess)))
    }
}
