//! Duration strings such as `15s`, `500ms` or `1m30s`.
//!
//! Used for timeout values in both the TOML file and the environment.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Parse a duration made of one or more `<integer><unit>` segments.
///
/// Units: `ms`, `s`, `m`, `h`. A bare `0` is accepted.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let trimmed = input.trim();
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }
    if trimmed.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total_millis: u64 = 0;
    let mut rest = trimmed;
    while !rest.is_empty() {
        let digits = rest.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("invalid duration '{input}': expected a number"));
        }
        let (num_str, tail) = rest.split_at(digits);
        let value: u64 = num_str
            .parse()
            .map_err(|_| format!("invalid duration '{input}': number out of range"))?;

        let unit_len = tail.find(|ch: char| ch.is_ascii_digit()).unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let millis = match unit {
            "ms" => value,
            "s" => value.saturating_mul(1_000),
            "m" => value.saturating_mul(60_000),
            "h" => value.saturating_mul(3_600_000),
            "" => return Err(format!("invalid duration '{input}': missing unit")),
            other => return Err(format!("invalid duration '{input}': unknown unit '{other}'")),
        };
        total_millis = total_millis.saturating_add(millis);
        rest = next;
    }

    Ok(Duration::from_millis(total_millis))
}

/// Render a duration in the same notation [`parse_duration`] accepts.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis % 1_000 == 0 {
        format!("{}s", millis / 1_000)
    } else {
        format!("{millis}ms")
    }
}

/// Serde adapter for `#[serde(with = "...")]`.
pub mod text {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_duration(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
