//! Working time elapsed between two timestamps.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::calendar::BusinessCalendar;
use crate::error::{CalendarError, Result};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// The window start on every date from `start` to `end`, inclusive.
///
/// Generated lazily; clone it to replay the sequence from the beginning.
#[derive(Debug, Clone)]
pub struct WindowStarts {
    next: Option<NaiveDate>,
    end: NaiveDate,
    time: NaiveTime,
}

impl Iterator for WindowStarts {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.next.filter(|d| *d <= self.end)?;
        self.next = date.succ_opt();
        Some(date.and_time(self.time))
    }
}

impl BusinessCalendar {
    /// Dates from `start` to `end` inclusive, each at the window start time.
    /// Empty when `start` is after `end`.
    pub fn window_starts(&self, start: NaiveDate, end: NaiveDate) -> WindowStarts {
        WindowStarts {
            next: Some(start),
            end,
            time: self.window().start(),
        }
    }

    /// Working hours elapsed between `start` and `end`.
    ///
    /// Both ends are first moved onto working time: clamped into their day's
    /// window, then carried forward whole days (time of day kept) until they
    /// land on a working day. Weekends and holidays between them contribute
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidRange`] if `start` is after `end`, and
    /// [`CalendarError::Configuration`] if the holiday set leaves no working day.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use delivery_calendar::{BusinessCalendar, BusinessWindow};
    ///
    /// let cal = BusinessCalendar::without_holidays(BusinessWindow::new(9, 0, 17, 0).unwrap());
    /// let friday = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap().and_hms_opt(15, 0, 0).unwrap();
    /// let monday = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap().and_hms_opt(11, 0, 0).unwrap();
    /// assert_eq!(cal.duration_in_working_hours(friday, monday).unwrap(), 4.0);
    /// ```
    pub fn duration_in_working_hours(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<f64> {
        if start > end {
            return Err(CalendarError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }

        let start = self.skip_non_working_days(self.snap_to_window(start)?, false)?;
        let end = self.skip_non_working_days(self.snap_to_window(end)?, false)?;
        // A start carried over a weekend can pass an end that was already on working time.
        let start = start.min(end);

        let elapsed = if start.date() == end.date() {
            end - start
        } else {
            self.window_starts(start.date(), end.date())
                .filter(|day| self.is_working_day(day.date()))
                .map(|day| {
                    if day.date() == start.date() {
                        self.window().end_on(day.date()) - start
                    } else if day.date() == end.date() {
                        end - day
                    } else {
                        TimeDelta::minutes(self.workday_duration_minutes())
                    }
                })
                .fold(TimeDelta::zero(), |total, part| total + part)
        };

        let hours = elapsed.num_milliseconds() as f64 / MILLIS_PER_HOUR;
        tracing::debug!(%start, %end, hours, "measured working duration");
        Ok(hours)
    }

    /// Working days elapsed between `start` and `end`, as a fraction of the
    /// workday length.
    pub fn duration_in_working_days(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<f64> {
        let hours = self.duration_in_working_hours(start, end)?;
        Ok(hours / (self.workday_duration_minutes() as f64 / 60.0))
    }
}
