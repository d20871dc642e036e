use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DayKey, Guess, Interval, SlotNumber, SubmissionRecord, UserId};

pub trait DBConvertible: Sized {
    type DBType;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError>;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError>;
}

#[derive(Debug, Error)]
pub enum DBFromConversionError {
    #[error("Invalid interval: {0}")]
    InvalidInterval(i64),
    #[error("Invalid slot: {0}")]
    InvalidSlot(i64),
    #[error("Invalid prediction value: {0}")]
    InvalidValue(f64),
    #[error("Slot {0} has only one of value and interval")]
    IncompleteSlot(SlotNumber),
}

#[derive(Debug, Error)]
pub enum DBToConversionError {
    #[error("Prediction value is not finite: {0}")]
    NonFiniteValue(f64),
}

impl DBConvertible for Interval {
    type DBType = i64;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(self.get() as _)
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        u8::try_from(*value)
            .ok()
            .and_then(Interval::new)
            .ok_or(DBFromConversionError::InvalidInterval(*value))
    }
}

impl DBConvertible for SlotNumber {
    type DBType = i64;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(self.get() as _)
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        u8::try_from(*value)
            .ok()
            .and_then(SlotNumber::from_repr)
            .ok_or(DBFromConversionError::InvalidSlot(*value))
    }
}

/// A guess as stored: the prediction and its interval number.
impl DBConvertible for Guess {
    type DBType = (f64, i64);

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        if !self.value.is_finite() {
            return Err(DBToConversionError::NonFiniteValue(self.value));
        }

        Ok((self.value, self.interval.to_db()?))
    }

    fn from_db((value, interval): &Self::DBType) -> Result<Self, DBFromConversionError> {
        if !value.is_finite() {
            return Err(DBFromConversionError::InvalidValue(*value));
        }

        Ok(Guess {
            value: *value,
            interval: Interval::from_db(interval)?,
        })
    }
}

/// Table entity for one user on one day.
///
/// Absent slots are skipped on serialization so that a merge only touches the
/// slot being written.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionEntity {
    #[serde(rename = "PartitionKey")]
    pub partition_key: String,
    #[serde(rename = "RowKey")]
    pub row_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction1_t: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction2_t: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction3_t: Option<i64>,
}

impl SubmissionEntity {
    pub fn keys(day: &DayKey, user: &UserId) -> SubmissionEntity {
        SubmissionEntity {
            partition_key: day.0.clone(),
            row_key: user.0.clone(),
            ..Default::default()
        }
    }

    /// An entity carrying the keys and a single slot.
    pub fn for_guess(
        day: &DayKey,
        user: &UserId,
        slot: SlotNumber,
        guess: &Guess,
    ) -> Result<SubmissionEntity, DBToConversionError> {
        let mut entity = SubmissionEntity::keys(day, user);
        entity.set_slot(slot, guess.to_db()?);
        Ok(entity)
    }

    fn slot(&self, slot: SlotNumber) -> (Option<f64>, Option<i64>) {
        match slot {
            SlotNumber::One => (self.prediction1, self.prediction1_t),
            SlotNumber::Two => (self.prediction2, self.prediction2_t),
            SlotNumber::Three => (self.prediction3, self.prediction3_t),
        }
    }

    fn set_slot(&mut self, slot: SlotNumber, (value, interval): (f64, i64)) {
        let (value_field, interval_field) = match slot {
            SlotNumber::One => (&mut self.prediction1, &mut self.prediction1_t),
            SlotNumber::Two => (&mut self.prediction2, &mut self.prediction2_t),
            SlotNumber::Three => (&mut self.prediction3, &mut self.prediction3_t),
        };

        *value_field = Some(value);
        *interval_field = Some(interval);
    }
}

impl DBConvertible for SubmissionRecord {
    type DBType = SubmissionEntity;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        let mut entity = SubmissionEntity::keys(&self.day, &self.user);

        for (slot, guess) in self.filled_slots() {
            entity.set_slot(slot, guess.to_db()?);
        }

        Ok(entity)
    }

    fn from_db(entity: &Self::DBType) -> Result<Self, DBFromConversionError> {
        let mut record = SubmissionRecord::new(
            DayKey(entity.partition_key.clone()),
            UserId(entity.row_key.clone()),
        );

        for slot in [SlotNumber::One, SlotNumber::Two, SlotNumber::Three] {
            match entity.slot(slot) {
                (Some(value), Some(interval)) => {
                    record.set_slot(slot, Guess::from_db(&(value, interval))?)
                }
                (None, None) => {}
                _ => return Err(DBFromConversionError::IncompleteSlot(slot)),
            }
        }

        Ok(record)
    }
}
