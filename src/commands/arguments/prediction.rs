use std::str::FromStr;

use lazy_regex::regex_captures;

use crate::{commands::CommandError, replies::Reply};

use super::super::user_err;

/// A numeric guess typed after the slash command.
///
/// Leading whitespace is skipped and anything after the leading number is
/// ignored, so `105.25 please` reads as `105.25`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction(f64);

impl Prediction {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Prediction {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = regex_captures!(
            r#"^\s*([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)"#,
            s
        )
        .and_then(|(_whole, number)| number.parse::<f64>().ok())
        .filter(|value| value.is_finite());

        match value {
            Some(value) => Ok(Prediction(value)),
            None => Err(user_err(Reply::NotANumber {
                input: s.to_owned(),
            })),
        }
    }
}
