//! Calendar configuration: an optional JSON file, overridden by flags.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use delivery_calendar::{BusinessCalendar, BusinessWindow, HolidayPeriod, HolidaySource, StaticHolidaySource};
use serde::Deserialize;

/// Shape of the `--config` file.
///
/// ```json
/// { "window": "09:00-17:00", "holidays": [{ "name": "New Year", "start": "2027-01-01", "end": "2027-01-01" }] }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    #[serde(default)]
    pub window: Option<BusinessWindow>,
    #[serde(default)]
    pub holidays: Vec<HolidayPeriod>,
}

impl CalendarConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            holidays = config.holidays.len(),
            "loaded calendar config"
        );
        Ok(config)
    }

    /// Apply flag overrides: a window replaces the file's, holidays are appended.
    pub fn with_overrides(mut self, window: Option<BusinessWindow>, holidays: Vec<HolidayPeriod>) -> Self {
        if window.is_some() {
            self.window = window;
        }
        self.holidays.extend(holidays);
        self
    }

    pub fn into_calendar(self) -> Result<BusinessCalendar> {
        let window = self.window.unwrap_or_default();
        let holidays = StaticHolidaySource::new(self.holidays)
            .resolve_holiday_dates()
            .context("resolving holidays")?;
        tracing::info!(%window, holidays = holidays.len(), "calendar ready");
        Ok(BusinessCalendar::new(window, holidays))
    }
}

/// Parse `YYYY-MM-DD` or an inclusive `YYYY-MM-DD..YYYY-MM-DD` range.
pub fn parse_holiday(s: &str) -> std::result::Result<HolidayPeriod, String> {
    let parse = |d: &str| {
        NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").map_err(|e| format!("'{d}': {e}"))
    };
    match s.split_once("..") {
        Some((start, end)) => {
            HolidayPeriod::new(parse(start)?, parse(end)?).map_err(|e| e.to_string())
        }
        None => Ok(HolidayPeriod::single(parse(s)?)),
    }
}

/// Parse `YYYY-MM-DDTHH:MM[:SS]`; a space may stand in for the `T`.
pub fn parse_timestamp(s: &str) -> std::result::Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM[:SS], got '{s}'"))
}

pub fn parse_window(s: &str) -> std::result::Result<BusinessWindow, String> {
    s.parse().map_err(|e: delivery_calendar::CalendarError| e.to_string())
}
