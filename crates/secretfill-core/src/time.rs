//! Time and duration utilities.

use secretfill_types::{SecretfillError, Result};
use std::time::Duration;

/// Parse a duration such as `90s`, `5m`, `1h30m` or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SecretfillError::Config("empty duration".to_string()));
    }
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = 0u64;
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let unit = match c {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            'd' => 86400,
            _ => return Err(SecretfillError::Config(format!("invalid duration unit '{}' in {}", c, s))),
        };
        let n: u64 = digits
            .parse()
            .map_err(|_| SecretfillError::Config(format!("invalid duration: {}", s)))?;
        total += n * unit;
        digits.clear();
    }
    if !digits.is_empty() {
        return Err(SecretfillError::Config(format!("missing unit after {} in {}", digits, s)));
    }

    Ok(Duration::from_secs(total))
}

/// Format a duration in human-readable form.
pub fn pretty_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("42").unwrap(), Duration::from_secs(42));

        assert!(parse_duration("").is_err());
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("1h30").is_err());
    }

    #[test]
    fn test_pretty_duration() {
        assert_eq!(pretty_duration(Duration::from_secs(42)), "42s");
        assert_eq!(pretty_duration(Duration::from_secs(300)), "5m 0s");
        assert_eq!(pretty_duration(Duration::from_secs(5400)), "1h 30m");
    }
}
