use time::macros::format_description;
use time::{format_description, OffsetDateTime};

const DAY_KEY_FORMAT: &[format_description::FormatItem<'_>] =
    format_description!("[year][month][day]");

/// Formats the calendar date as `YYYYMMDD`, keeping the offset of `date_time`.
pub fn format_day_key(date_time: OffsetDateTime) -> String {
    date_time
        .format(DAY_KEY_FORMAT)
        .expect("Hard-coded format should be correct")
}

/// Formats a prediction with the shortest decimal form that reads back to the same value.
pub fn format_prediction(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{format_day_key, format_prediction};

    #[test]
    fn day_key_is_zero_padded() {
        assert_eq!(format_day_key(datetime!(2026-03-04 10:00:00 UTC)), "20260304");
    }

    #[test]
    fn day_key_keeps_offset() {
        assert_eq!(format_day_key(datetime!(2026-03-04 23:30:00 -5)), "20260304");
    }

    #[test]
    fn predictions() {
        assert_eq!(format_prediction(105.25), "105.25");
        assert_eq!(format_prediction(100.0), "100");
        assert_eq!(format_prediction(-0.5), "-0.5");
        assert_eq!(format_prediction(4321.1), "4321.1");
    }
}
