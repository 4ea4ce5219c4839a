//! The daily business window: the time-of-day span during which work counts.
//!
//! A window is a half-open interval `[start, end)` within a single day.
//! Windows that wrap past midnight are rejected at construction.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: i64 = 1440;

/// Daily working window, e.g. 09:00 to 17:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BusinessWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl BusinessWindow {
    /// Build a window from its four components.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Configuration`] if an hour is outside `0..=23`,
    /// a minute is outside `0..=59`, or the start is not strictly before the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use delivery_calendar::BusinessWindow;
    ///
    /// let window = BusinessWindow::new(9, 0, 17, 30).unwrap();
    /// assert_eq!(window.duration_minutes(), 510);
    /// assert!(BusinessWindow::new(17, 0, 9, 0).is_err());
    /// ```
    pub fn new(start_hour: u32, start_minute: u32, end_hour: u32, end_minute: u32) -> Result<Self> {
        let start = time_of_day(start_hour, start_minute, "start")?;
        let end = time_of_day(end_hour, end_minute, "end")?;

        if start >= end {
            return Err(CalendarError::Configuration(format!(
                "window start {} must be before window end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }

        Ok(Self { start, end })
    }

    /// First working time of day (inclusive).
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// End of the working day (exclusive).
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// The window start on `date`.
    pub fn start_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start)
    }

    /// The window end on `date`.
    pub fn end_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.end)
    }

    /// Length of one working day in minutes.
    pub fn duration_minutes(&self) -> i64 {
        minutes_since_midnight(self.end) - minutes_since_midnight(self.start)
    }

    /// Minutes of each day that fall outside the window.
    pub fn off_minutes(&self) -> i64 {
        MINUTES_PER_DAY - self.duration_minutes()
    }

    /// Whether `time` lies inside `[start, end)`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }
}

impl Default for BusinessWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl fmt::Display for BusinessWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

impl FromStr for BusinessWindow {
    type Err = CalendarError;

    /// Parse the `HH:MM-HH:MM` form.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (start, end) = s.split_once('-').ok_or_else(|| {
            CalendarError::Configuration(format!("window must look like HH:MM-HH:MM: '{s}'"))
        })?;
        let (start_hour, start_minute) = parse_hh_mm(start)?;
        let (end_hour, end_minute) = parse_hh_mm(end)?;
        Self::new(start_hour, start_minute, end_hour, end_minute)
    }
}

impl TryFrom<String> for BusinessWindow {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<BusinessWindow> for String {
    fn from(window: BusinessWindow) -> Self {
        window.to_string()
    }
}

fn time_of_day(hour: u32, minute: u32, which: &str) -> Result<NaiveTime> {
    if hour > 23 || minute > 59 {
        return Err(CalendarError::Configuration(format!(
            "window {which} {hour:02}:{minute:02} is not a valid time of day"
        )));
    }
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        CalendarError::Configuration(format!(
            "window {which} {hour:02}:{minute:02} is not a valid time of day"
        ))
    })
}

fn parse_hh_mm(s: &str) -> Result<(u32, u32)> {
    let s = s.trim();
    let invalid = || CalendarError::Configuration(format!("expected HH:MM, got '{s}'"));
    let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
    let hour = hour.parse::<u32>().map_err(|_| invalid())?;
    let minute = minute.parse::<u32>().map_err(|_| invalid())?;
    Ok((hour, minute))
}

pub(crate) fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}
