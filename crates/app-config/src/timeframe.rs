use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    Milliseconds(u64),
    Seconds(u64),
    Minutes(u64),
    Hours(u64),
    Days(u64),
    Weeks(u64),
}

impl From<Timeframe> for Duration {
    fn from(value: Timeframe) -> Self {
        (&value).into()
    }
}

impl From<&Timeframe> for Duration {
    fn from(val: &Timeframe) -> Self {
        match val {
            Timeframe::Milliseconds(ms) => Self::from_millis(*ms),
            Timeframe::Seconds(s) => Self::from_secs(*s),
            Timeframe::Minutes(m) => Self::from_secs(*m * 60),
            Timeframe::Hours(h) => Self::from_secs(*h * 60 * 60),
            Timeframe::Days(d) => Self::from_secs(*d * 24 * 60 * 60),
            Timeframe::Weeks(w) => Self::from_secs(*w * 7 * 24 * 60 * 60),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Milliseconds(n) => write!(f, "{n}ms"),
            Self::Seconds(n) => write!(f, "{n}s"),
            Self::Minutes(n) => write!(f, "{n}min"),
            Self::Hours(n) => write!(f, "{n}h"),
            Self::Days(n) => write!(f, "{n}d"),
            Self::Weeks(n) => write!(f, "{n}w"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeframeParseError(String);
impl std::fmt::Display for TimeframeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for TimeframeParseError {}

impl Timeframe {
    /// Parse strings such as `300s`, `5min`, `1 week`.
    pub fn parse_str(arg: &str) -> Result<Self, TimeframeParseError> {
        let arg = arg.trim().to_lowercase();

        let num = arg
            .chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>();

        if num.is_empty() {
            return Err(TimeframeParseError(format!(
                "invalid timeframe (no number found): {arg}"
            )));
        }

        let unit = arg.chars().skip(num.len()).collect::<String>();

        let num = num.parse::<u64>().map_err(|_| {
            TimeframeParseError(format!("invalid timeframe (invalid number): {arg}"))
        })?;

        match unit.trim() {
            "w" | "week" | "weeks" => Ok(Self::Weeks(num)),
            "d" | "day" | "days" => Ok(Self::Days(num)),
            "h" | "hr" | "hrs" | "hour" | "hours" => Ok(Self::Hours(num)),
            "m" | "min" | "mins" | "minute" | "minutes" => Ok(Self::Minutes(num)),
            "" | "s" | "sec" | "secs" | "second" | "seconds" => Ok(Self::Seconds(num)),
            "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => Ok(Self::Milliseconds(num)),
            _ => Err(TimeframeParseError(format!(
                "invalid timeframe (invalid unit): {arg}"
            ))),
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[must_use]
pub fn value_parser_parse_timeframe() -> impl clap::builder::TypedValueParser {
    move |s: &str| Timeframe::parse_str(s)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_units() {
        assert_eq!(Timeframe::parse_str("5min"), Ok(Timeframe::Minutes(5)));
        assert_eq!(Timeframe::parse_str(" 1 week "), Ok(Timeframe::Weeks(1)));
        assert_eq!(Timeframe::parse_str("300"), Ok(Timeframe::Seconds(300)));
        assert_eq!(
            Timeframe::parse_str("1500ms"),
            Ok(Timeframe::Milliseconds(1500))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(Timeframe::parse_str("soon").is_err());
        assert!(Timeframe::parse_str("5 fortnights").is_err());
    }

    #[test]
    fn converts_to_duration() {
        assert_eq!(
            Duration::from(Timeframe::Minutes(5)),
            Duration::from_secs(300)
        );
        assert_eq!(
            Duration::from(Timeframe::Weeks(1)),
            Duration::from_secs(604_800)
        );
    }

    #[test]
    fn display_parses_back() {
        for tf in [
            Timeframe::Milliseconds(10),
            Timeframe::Minutes(5),
            Timeframe::Weeks(2),
        ] {
            assert_eq!(Timeframe::parse_str(&tf.to_string()), Ok(tf));
        }
    }
}
