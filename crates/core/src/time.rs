use anyhow::Context;
use chrono::NaiveDateTime;

// The feed emits local wall-clock timestamps with no zone designator, with
// or without seconds.
const WALL_CLOCK_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

pub fn parse_wall_clock(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    WALL_CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

pub fn now_local() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Evaluation time for one selection pass: an explicit override if given,
/// otherwise the sampled local time. Callers re-sample per invocation; the
/// result is never cached.
pub fn resolve_evaluation_time(
    at_arg: Option<&str>,
    now: NaiveDateTime,
) -> anyhow::Result<NaiveDateTime> {
    if let Some(s) = at_arg {
        return parse_wall_clock(s)
            .with_context(|| format!("invalid evaluation time {s:?} (expected YYYY-MM-DDTHH:MM[:SS])"));
    }
    Ok(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_with_and_without_seconds() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(parse_wall_clock("2024-01-01T08:30:00"), Some(expected));
        assert_eq!(parse_wall_clock("2024-01-01T08:30"), Some(expected));
        assert_eq!(parse_wall_clock(" 2024-01-01T08:30 "), Some(expected));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_wall_clock("not a time"), None);
        assert_eq!(parse_wall_clock("2024-13-01T08:30"), None);
        assert_eq!(parse_wall_clock(""), None);
    }

    #[test]
    fn override_wins_over_fallback() {
        let fallback = NaiveDate::from_ymd_opt(2026, 8, 26)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let resolved = resolve_evaluation_time(Some("2024-01-01T08:30"), fallback).unwrap();
        assert_eq!(resolved.to_string(), "2024-01-01 08:30:00");

        assert_eq!(resolve_evaluation_time(None, fallback).unwrap(), fallback);
        assert!(resolve_evaluation_time(Some("bogus"), fallback).is_err());
    }
}
