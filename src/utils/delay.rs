use crate::utils::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static DELAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(\d+)\s*(?:h|hr|hrs|hours?))?\s*(?:(\d+)\s*(?:m|min|mins|minutes?)?)?\s*$")
        .unwrap()
});

/// Parse a delay such as `15`, `15m`, `1h`, `1h30m` or `2 hours` into minutes
pub fn parse_delay(input: &str) -> AppResult<u32> {
    let invalid = || {
        AppError::Validation(format!(
            "Invalid delay '{}'. Use minutes (15, 15m) or hours (1h, 1h30m)",
            input
        ))
    };

    let caps = DELAY_RE.captures(input).ok_or_else(invalid)?;
    let hours = caps.get(1).map(|m| m.as_str());
    let minutes = caps.get(2).map(|m| m.as_str());
    if hours.is_none() && minutes.is_none() {
        return Err(invalid());
    }

    let parse = |s: Option<&str>| -> AppResult<u32> {
        s.map_or(Ok(0), |v| v.parse::<u32>().map_err(|_| invalid()))
    };

    parse(hours)?
        .checked_mul(60)
        .and_then(|h| h.checked_add(parse(minutes).ok()?))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_minutes() {
        assert_eq!(parse_delay("15").unwrap(), 15);
        assert_eq!(parse_delay(" 15m ").unwrap(), 15);
        assert_eq!(parse_delay("45 mins").unwrap(), 45);
    }

    #[test]
    fn test_hours_and_minutes() {
        assert_eq!(parse_delay("1h").unwrap(), 60);
        assert_eq!(parse_delay("1h30m").unwrap(), 90);
        assert_eq!(parse_delay("2 hours 5").unwrap(), 125);
        assert_eq!(parse_delay("1H").unwrap(), 60);
    }

    #[test]
    fn test_rejects_garbage() {
        for bad in ["", "  ", "soon", "-5", "1.5h", "99999999999"] {
            assert!(
                matches!(parse_delay(bad), Err(AppError::Validation(_))),
                "accepted {:?}",
                bad
            );
        }
    }
}
