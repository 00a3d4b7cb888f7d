//! Calendar bucketing and percentile helpers shared by the series builder.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%z"];

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Linear interpolation at rank `p * (n - 1)` over an ascending slice.
/// An empty slice yields `0.0`.
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    let rank = p.clamp(0.0, 1.0) * (sorted_values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * weight
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Accepts RFC 3339 plus the `2024-01-31 12:00:00 +0100` form git prints.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime);
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn week_start_is_monday_and_idempotent() {
        for day in ["2024-01-01", "2024-01-03", "2024-01-07", "2024-02-29", "2023-12-31"] {
            let start = week_start(date(day));
            assert_eq!(start.weekday(), Weekday::Mon);
            assert_eq!(week_start(start), start);
            assert!(start <= date(day));
        }
        assert_eq!(week_start(date("2024-01-07")), date("2024-01-01"));
        assert_eq!(week_start(date("2023-12-31")), date("2023-12-25"));
    }

    #[test]
    fn month_start_is_first_day() {
        assert_eq!(month_start(date("2024-02-29")), date("2024-02-01"));
        assert_eq!(month_start(date("2024-03-01")), date("2024-03-01"));
    }

    #[test]
    fn percentile_bounds_are_min_and_max() {
        let values = [1.5, 2.0, 4.0, 9.25];
        assert_eq!(percentile(&values, 0.0), 1.5);
        assert_eq!(percentile(&values, 1.0), 9.25);
        assert_eq!(percentile(&[3.0], 0.9), 3.0);
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let values = [1.0, 3.0, 5.0];
        assert_eq!(percentile(&values, 0.5), 3.0);
        assert_eq!(round2(percentile(&values, 0.9)), 4.6);
        assert_eq!(percentile(&[0.0, 10.0], 0.25), 2.5);
    }

    #[test]
    fn percentile_of_nothing_is_zero() {
        assert_eq!(percentile(&[], 0.0), 0.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
        assert_eq!(percentile(&[], 1.0), 0.0);
    }

    #[test]
    fn parses_supported_timestamp_forms() {
        let rfc = parse_timestamp("2024-01-31T12:00:00Z").unwrap();
        let git = parse_timestamp("2024-01-31 13:00:00 +0100").unwrap();
        assert_eq!(rfc, git);
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
