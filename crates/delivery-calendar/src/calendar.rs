//! The business calendar: working-day and working-instant predicates, and
//! the primitives that move a timestamp onto working time.
//!
//! All operations are pure. They take a timestamp by value and return a new
//! one; the calendar itself is immutable and can be shared across threads.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};

use crate::error::{CalendarError, Result};
use crate::holidays::HolidaySet;
use crate::window::BusinessWindow;

/// Upper bound on consecutive non-working days crossed by a single skip.
pub const MAX_LOOKAHEAD_DAYS: u32 = 3650;

/// A working window plus the dates on which no work happens.
#[derive(Debug, Clone, Default)]
pub struct BusinessCalendar {
    window: BusinessWindow,
    holidays: Arc<HolidaySet>,
}

impl BusinessCalendar {
    /// Build a calendar. `holidays` may be an owned [`HolidaySet`] or an
    /// `Arc` handed out by a cached [`HolidaySource`](crate::HolidaySource).
    pub fn new(window: BusinessWindow, holidays: impl Into<Arc<HolidaySet>>) -> Self {
        Self {
            window,
            holidays: holidays.into(),
        }
    }

    /// A calendar with only weekends off.
    pub fn without_holidays(window: BusinessWindow) -> Self {
        Self::new(window, HolidaySet::new())
    }

    pub fn window(&self) -> &BusinessWindow {
        &self.window
    }

    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// Saturday or Sunday.
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(date)
    }

    /// Neither a weekend nor a holiday.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.is_weekend(date) && !self.is_holiday(date)
    }

    /// Whether `t` falls on a working day inside the window. The window end is
    /// exclusive: exactly 17:00 in a 09:00-17:00 window is not working time.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use delivery_calendar::{BusinessCalendar, BusinessWindow};
    ///
    /// let cal = BusinessCalendar::without_holidays(BusinessWindow::new(9, 0, 17, 0).unwrap());
    /// let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    /// assert!(cal.is_working_instant(monday.and_hms_opt(9, 0, 0).unwrap()));
    /// assert!(!cal.is_working_instant(monday.and_hms_opt(17, 0, 0).unwrap()));
    /// ```
    pub fn is_working_instant(&self, t: NaiveDateTime) -> bool {
        self.is_working_day(t.date()) && self.window.contains(t.time())
    }

    /// Length of one working day in minutes.
    pub fn workday_duration_minutes(&self) -> i64 {
        self.window.duration_minutes()
    }

    /// Advance `t` one calendar day at a time while its date is not a working day.
    ///
    /// With `reset_to_window_start` the time of day is set to the window start
    /// after every step; otherwise the time of day is carried unchanged. A `t`
    /// already on a working day is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Configuration`] if no working day is found
    /// within [`MAX_LOOKAHEAD_DAYS`], or [`CalendarError::InvalidArgument`] if
    /// the date leaves chrono's representable range.
    pub fn skip_non_working_days(
        &self,
        t: NaiveDateTime,
        reset_to_window_start: bool,
    ) -> Result<NaiveDateTime> {
        let mut current = t;
        let mut skipped = 0u32;

        while !self.is_working_day(current.date()) {
            if skipped == MAX_LOOKAHEAD_DAYS {
                return Err(CalendarError::Configuration(format!(
                    "no working day within {MAX_LOOKAHEAD_DAYS} days of {}",
                    t.date()
                )));
            }
            current = add_days(current, 1)?;
            if reset_to_window_start {
                current = self.window.start_on(current.date());
            }
            skipped += 1;
        }

        if skipped > 0 {
            tracing::trace!(from = %t, to = %current, skipped, "skipped non-working days");
        }
        Ok(current)
    }

    /// Clamp `t` into its day's window: before the start snaps to the start,
    /// at or after the end moves to the next day's start. The date is not
    /// checked against weekends or holidays.
    pub fn snap_to_window(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        let date = t.date();
        if t < self.window.start_on(date) {
            Ok(self.window.start_on(date))
        } else if t >= self.window.end_on(date) {
            let next = add_days(t, 1)?;
            Ok(self.window.start_on(next.date()))
        } else {
            Ok(t)
        }
    }

    /// The first working instant at or after `t`.
    pub fn next_working_instant(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        let snapped = self.snap_to_window(t)?;
        self.skip_non_working_days(snapped, true)
    }
}

/// `t` moved forward by whole calendar days, keeping the time of day.
pub(crate) fn add_days(t: NaiveDateTime, days: u64) -> Result<NaiveDateTime> {
    t.checked_add_days(Days::new(days)).ok_or_else(|| {
        CalendarError::InvalidArgument(format!("{t} plus {days} days is out of range"))
    })
}
