use std::fmt::Display;

use crate::{
    models::{Interval, UserId},
    submission_policy::DenyReason,
    utils::formatting::format_prediction,
};

/// Every message the bot can post back to the channel.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    MarketClosed { user: UserId },
    LastThirtyMinutes { user: UserId },
    PredictionReceived { value: f64, interval: Interval },
    NotANumber { input: String },
    AlreadySubmitted,
    PredictionsFull,
    Error,
}

impl From<DenyReason> for Reply {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::PredictionsFull => Reply::PredictionsFull,
            DenyReason::AlreadySubmittedThisInterval => Reply::AlreadySubmitted,
        }
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Reply::*;

        match self {
            MarketClosed { user } => write!(f, "Market is closed, <@{user}>."),
            LastThirtyMinutes { user } => write!(
                f,
                "No more bets in the last 30 minutes of trading, <@{user}>."
            ),
            PredictionReceived { value, interval } => write!(
                f,
                "Guess ${} T{interval} received.",
                format_prediction(*value)
            ),
            NotANumber { input } => write!(f, "{input} is not a valid input. I need a number."),
            AlreadySubmitted => f.write_str("User already entered a guess in this trading hour."),
            PredictionsFull => f.write_str("User already has 3 guesses for the day."),
            Error => f.write_str("Something went wrong. Sorry for that."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Reply;
    use crate::{
        models::{Interval, UserId},
        submission_policy::DenyReason,
    };

    #[test]
    fn mentions_the_user_when_closed() {
        let user = UserId("U024BE7LH".into());

        assert_eq!(
            Reply::MarketClosed { user: user.clone() }.to_string(),
            "Market is closed, <@U024BE7LH>."
        );
        assert_eq!(
            Reply::LastThirtyMinutes { user }.to_string(),
            "No more bets in the last 30 minutes of trading, <@U024BE7LH>."
        );
    }

    #[test]
    fn received() {
        let reply = Reply::PredictionReceived {
            value: 105.25,
            interval: Interval::new(6).unwrap(),
        };

        assert_eq!(reply.to_string(), "Guess $105.25 T6 received.");
    }

    #[test]
    fn received_whole_number() {
        let reply = Reply::PredictionReceived {
            value: 420.0,
            interval: Interval::new(1).unwrap(),
        };

        assert_eq!(reply.to_string(), "Guess $420 T1 received.");
    }

    #[test]
    fn not_a_number_names_the_input() {
        let reply = Reply::NotANumber {
            input: "abc".into(),
        };

        assert_eq!(reply.to_string(), "abc is not a valid input. I need a number.");
    }

    #[test]
    fn denials() {
        assert_eq!(
            Reply::from(DenyReason::PredictionsFull).to_string(),
            "User already has 3 guesses for the day."
        );
        assert_eq!(
            Reply::from(DenyReason::AlreadySubmittedThisInterval).to_string(),
            "User already entered a guess in this trading hour."
        );
        assert_eq!(
            Reply::Error.to_string(),
            "Something went wrong. Sorry for that."
        );
    }
}
