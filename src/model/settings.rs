use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;

pub const DEFAULT_SMALL_THRESHOLD: usize = 50;
pub const DEFAULT_MEDIUM_THRESHOLD: usize = 250;

/// Values read from a settings file. Every field is optional; the command
/// line overrides whatever is present here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub since: Option<String>,
    pub until: Option<String>,
    pub small_threshold: Option<usize>,
    pub medium_threshold: Option<usize>,
}

// Create
impl Settings {
    pub fn from_config(path: &str) -> Result<Self> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }
}

// Parser
impl Settings {
    fn parse(json_str: &str) -> Result<Self> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut settings = Self::default();
        for (name, value) in elements {
            match name.as_str() {
                "since" => settings.since = Some(string_field(&name, &value)?),
                "until" => settings.until = Some(string_field(&name, &value)?),
                "smallThreshold" => settings.small_threshold = Some(count_field(&name, &value)?),
                "mediumThreshold" => settings.medium_threshold = Some(count_field(&name, &value)?),
                _ => log::warn!("Ignoring unknown settings field '{}'", name),
            }
        }
        Ok(settings)
    }
}

fn string_field(name: &str, value: &Value) -> Result<String> {
    let Some(value) = value.as_str() else {
        return Err(Error::Config(format!("'{}' must be a string", name)));
    };
    Ok(value.to_string())
}

fn count_field(name: &str, value: &Value) -> Result<usize> {
    let Some(value) = value.as_u64() else {
        return Err(Error::Config(format!("'{}' must be a positive integer", name)));
    };
    Ok(value as usize)
}

/// Boundaries between the small, medium and large pull request buckets.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SizeThresholds {
    pub small: usize,
    pub medium: usize,
}

impl SizeThresholds {
    pub fn new(small: usize, medium: usize) -> Result<Self> {
        if small == 0 || medium == 0 {
            return Err(Error::Config("size thresholds must be positive".to_string()));
        }
        if small >= medium {
            return Err(Error::Config(format!(
                "small threshold ({}) must be below medium threshold ({})",
                small, medium
            )));
        }
        Ok(Self { small, medium })
    }
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            small: DEFAULT_SMALL_THRESHOLD,
            medium: DEFAULT_MEDIUM_THRESHOLD,
        }
    }
}

/// Requested analysis bounds, inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Window {
    pub since: Option<DateTime<FixedOffset>>,
    pub until: Option<DateTime<FixedOffset>>,
}

impl Window {
    pub fn parse(since: Option<&str>, until: Option<&str>) -> Result<Self> {
        let since = since.map(|s| parse_bound(s, NaiveTime::MIN)).transpose()?;
        let until = until
            .map(|s| parse_bound(s, end_of_day()))
            .transpose()?;
        if let (Some(since), Some(until)) = (since, until) {
            if since > until {
                return Err(Error::Config(format!(
                    "since ({}) is after until ({})",
                    since, until
                )));
            }
        }
        Ok(Self { since, until })
    }

    pub fn contains(&self, datetime: &DateTime<FixedOffset>) -> bool {
        self.since.map_or(true, |since| *datetime >= since)
            && self.until.map_or(true, |until| *datetime <= until)
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

// A bare date expands to `time` in UTC.
fn parse_bound(value: &str, time: NaiveTime) -> Result<DateTime<FixedOffset>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime);
    }
    let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        return Err(Error::InvalidDate(value.to_string()));
    };
    Ok(Utc.from_utc_datetime(&date.and_time(time)).fixed_offset())
}
