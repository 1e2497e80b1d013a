use chrono::Duration;
use std::fmt;
use std::num::ParseFloatError;

#[derive(Debug, PartialEq)]
pub enum DurationParserError {
    Empty,
    InvalidFormat(String),
    UnknownUnit(String),
    ParseError(ParseFloatError),
}

impl From<ParseFloatError> for DurationParserError {
    fn from(e: ParseFloatError) -> Self {
        DurationParserError::ParseError(e)
    }
}

impl fmt::Display for DurationParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationParserError::Empty => write!(f, "empty duration"),
            DurationParserError::InvalidFormat(s) => write!(f, "invalid duration '{}'", s),
            DurationParserError::UnknownUnit(u) => write!(f, "unknown unit '{}'", u),
            DurationParserError::ParseError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DurationParserError {}

fn unit_in_seconds(unit: &str) -> Option<f64> {
    match unit {
        "h" => Some(3_600.0),
        "m" => Some(60.0),
        "s" => Some(1.0),
        "ms" => Some(0.001),
        "us" | "µs" => Some(0.000_001),
        "ns" => Some(0.000_000_001),
        _ => None,
    }
}

/// Parses a compound duration such as `2h`, `1h30m`, `1.5h` or `500ms`.
///
/// Every number needs a unit; a bare `2` is rejected here (see [`parse_hours`]).
pub fn parse_duration(time_str: &str) -> Result<Duration, DurationParserError> {
    let input = time_str.trim();
    if input.is_empty() {
        return Err(DurationParserError::Empty);
    }

    let mut total_seconds = 0.0;
    let mut rest = input;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(DurationParserError::InvalidFormat(input.to_string()));
        }
        let (num_str, tail) = rest.split_at(number_len);
        let num = num_str.parse::<f64>()?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        if unit_len == 0 {
            return Err(DurationParserError::InvalidFormat(input.to_string()));
        }
        let (unit, next) = tail.split_at(unit_len);
        let seconds = unit_in_seconds(unit)
            .ok_or_else(|| DurationParserError::UnknownUnit(unit.to_string()))?;

        total_seconds += num * seconds;
        rest = next;
    }

    Ok(Duration::milliseconds((total_seconds * 1_000.0).round() as i64))
}

/// Parses a free-text duration into hours, retrying once with an `h` suffix so that a
/// bare number counts as hours.
pub fn parse_hours(time_str: &str) -> Result<f64, DurationParserError> {
    let duration = match parse_duration(time_str) {
        Ok(duration) => duration,
        Err(_) => parse_duration(&format!("{}h", time_str.trim()))?,
    };
    Ok(duration.num_milliseconds() as f64 / 3_600_000.0)
}
