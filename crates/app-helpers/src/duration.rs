use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,
    #[error("too many components in duration {0:?}")]
    TooManyParts(String),
    #[error("invalid number in duration {0:?}")]
    InvalidNumber(String),
    #[error("duration {0:?} is too large")]
    TooLarge(String),
}

/// Parse a clock style duration (`SS`, `MM:SS` or `HH:MM:SS`) into seconds.
///
/// This is the format yt-dlp prints for `--get-duration`.
pub fn parse_clock_duration(input: &str) -> Result<u64, DurationParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let parts = input
        .split(':')
        .map(|x| {
            x.trim()
                .parse::<u64>()
                .map_err(|_| DurationParseError::InvalidNumber(input.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if parts.len() > 3 {
        return Err(DurationParseError::TooManyParts(input.to_string()));
    }

    parts
        .into_iter()
        .try_fold(0_u64, |acc, x| acc.checked_mul(60)?.checked_add(x))
        .ok_or_else(|| DurationParseError::TooLarge(input.to_string()))
}
