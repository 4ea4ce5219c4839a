//! Delivery projection: the timestamp reached after consuming a given amount
//! of working time from an origin.
//!
//! Time is consumed in whole seconds. The projection first moves the origin
//! onto working time, then steps over whole working days, then adds the
//! remainder and rolls any overflow past the off-hours into the next window.

use chrono::{Days, NaiveDateTime, TimeDelta};

use crate::calendar::{add_days, BusinessCalendar};
use crate::error::{CalendarError, Result};

const SECONDS_PER_HOUR: f64 = 3600.0;

impl BusinessCalendar {
    /// Project `origin` forward by `duration_hours` of working time.
    ///
    /// The result is always a working instant. An origin outside working time
    /// is first moved to the next window start, so a zero duration returns
    /// the first working instant at or after `origin`.
    ///
    /// While stepping over whole working days the time of day is carried
    /// unchanged; only the initial move off a non-working origin resets it to
    /// the window start.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidArgument`] for a negative or non-finite
    /// duration, or one that leaves the representable date range, and
    /// [`CalendarError::Configuration`] if the holiday set leaves no working day.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use delivery_calendar::{BusinessCalendar, BusinessWindow};
    ///
    /// let cal = BusinessCalendar::without_holidays(BusinessWindow::new(9, 0, 17, 0).unwrap());
    /// // Friday 16:00 plus two working hours is Monday 10:00.
    /// let friday = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap().and_hms_opt(16, 0, 0).unwrap();
    /// let monday = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap().and_hms_opt(10, 0, 0).unwrap();
    /// assert_eq!(cal.project(friday, 2.0).unwrap(), monday);
    /// ```
    pub fn project(&self, origin: NaiveDateTime, duration_hours: f64) -> Result<NaiveDateTime> {
        let duration = hours_to_seconds(duration_hours)?;
        let workday = self.workday_duration_minutes() * 60;
        let off_hours = self.window().off_minutes() * 60;

        let start = self.next_working_instant(origin)?;
        let whole_workdays = duration / workday;

        // The date whose window end decides whether the last addition overflowed.
        let (anchor, reached) = if whole_workdays >= 1 {
            let remainder = duration - whole_workdays * workday;
            let steps = u64::try_from(whole_workdays).unwrap_or(u64::MAX);
            start.checked_add_days(Days::new(steps)).ok_or_else(|| {
                CalendarError::InvalidArgument(format!(
                    "{duration_hours} working hours from {start} is out of range"
                ))
            })?;

            let mut current = start;
            for _ in 0..steps {
                current = add_days(current, 1)?;
                current = self.skip_non_working_days(current, false)?;
            }
            tracing::trace!(whole_workdays, remainder, stepped_to = %current, "stepped whole workdays");

            (current.date(), add_seconds(current, remainder)?)
        } else {
            let reached = add_seconds(start, duration)?;
            (start.date(), self.skip_non_working_days(reached, false)?)
        };

        let reached = if reached >= self.window().end_on(anchor) {
            let rolled = add_seconds(reached, off_hours)?;
            self.skip_non_working_days(rolled, false)?
        } else {
            reached
        };

        let delivery = self.skip_non_working_days(reached, false)?;
        tracing::debug!(%origin, duration_hours, %delivery, "projected delivery");
        Ok(delivery)
    }
}

fn hours_to_seconds(hours: f64) -> Result<i64> {
    if !hours.is_finite() {
        return Err(CalendarError::InvalidArgument(format!(
            "duration must be a finite number of hours, got {hours}"
        )));
    }
    if hours < 0.0 {
        return Err(CalendarError::InvalidArgument(format!(
            "duration must not be negative, got {hours} hours"
        )));
    }

    let seconds = (hours * SECONDS_PER_HOUR).round();
    if seconds >= i64::MAX as f64 {
        return Err(CalendarError::InvalidArgument(format!(
            "duration of {hours} hours is too large"
        )));
    }
    Ok(seconds as i64)
}

fn add_seconds(t: NaiveDateTime, seconds: i64) -> Result<NaiveDateTime> {
    TimeDelta::try_seconds(seconds)
        .and_then(|delta| t.checked_add_signed(delta))
        .ok_or_else(|| CalendarError::InvalidArgument(format!("{t} plus {seconds}s is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BusinessWindow, HolidaySet};
    use chrono::{NaiveDate, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        d.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    // Week of 2026-03-02 (Mon) .. 2026-03-08 (Sun).
    fn mon() -> NaiveDate {
        date(2026, 3, 2)
    }
    fn tue() -> NaiveDate {
        date(2026, 3, 3)
    }
    fn wed() -> NaiveDate {
        date(2026, 3, 4)
    }
    fn thu() -> NaiveDate {
        date(2026, 3, 5)
    }
    fn fri() -> NaiveDate {
        date(2026, 3, 6)
    }
    fn next_mon() -> NaiveDate {
        date(2026, 3, 9)
    }

    fn cal(holidays: &[NaiveDate]) -> BusinessCalendar {
        BusinessCalendar::new(
            BusinessWindow::new(9, 0, 17, 0).unwrap(),
            holidays.iter().copied().collect::<HolidaySet>(),
        )
    }

    // ── reference scenarios ─────────────────────────────────────────────

    #[test]
    fn test_same_day() {
        assert_eq!(cal(&[]).project(at(mon(), 10, 0), 2.0).unwrap(), at(mon(), 12, 0));
    }

    #[test]
    fn test_overnight_rollover() {
        assert_eq!(cal(&[]).project(at(mon(), 16, 0), 2.0).unwrap(), at(tue(), 10, 0));
    }

    #[test]
    fn test_weekend_skip() {
        assert_eq!(cal(&[]).project(at(fri(), 16, 0), 2.0).unwrap(), at(next_mon(), 10, 0));
    }

    #[test]
    fn test_holiday_origin_snaps_forward() {
        assert_eq!(cal(&[wed()]).project(at(wed(), 10, 0), 0.0).unwrap(), at(thu(), 9, 0));
    }

    // ── origin clamping ─────────────────────────────────────────────────

    #[test]
    fn test_zero_duration_inside_window_is_identity() {
        let t = at(tue(), 11, 11);
        assert_eq!(cal(&[]).project(t, 0.0).unwrap(), t);
    }

    #[test]
    fn test_origin_before_window() {
        assert_eq!(cal(&[]).project(at(mon(), 6, 0), 1.5).unwrap(), at(mon(), 10, 30));
    }

    #[test]
    fn test_origin_exactly_at_window_end() {
        assert_eq!(cal(&[]).project(at(mon(), 17, 0), 1.0).unwrap(), at(tue(), 10, 0));
    }

    #[test]
    fn test_origin_on_saturday_night() {
        let saturday = date(2026, 3, 7);
        assert_eq!(cal(&[]).project(at(saturday, 22, 0), 3.0).unwrap(), at(next_mon(), 12, 0));
    }

    // ── whole workdays ──────────────────────────────────────────────────

    #[test]
    fn test_exactly_one_workday() {
        assert_eq!(cal(&[]).project(at(mon(), 9, 0), 8.0).unwrap(), at(tue(), 9, 0));
    }

    #[test]
    fn test_multiple_workdays_with_remainder() {
        // 1h Mon + 8h Tue + 1h Wed.
        assert_eq!(cal(&[]).project(at(mon(), 16, 0), 10.0).unwrap(), at(wed(), 10, 0));
    }

    #[test]
    fn test_workdays_across_weekend() {
        // Thu 10:00 + 16h = Mon 10:00.
        assert_eq!(cal(&[]).project(at(thu(), 10, 0), 16.0).unwrap(), at(next_mon(), 10, 0));
    }

    #[test]
    fn test_workdays_across_holiday_keep_time_of_day() {
        // Tuesday off: Mon 14:30 + 8h lands on Wed 14:30.
        assert_eq!(cal(&[tue()]).project(at(mon(), 14, 30), 8.0).unwrap(), at(wed(), 14, 30));
    }

    #[test]
    fn test_remainder_overflow_into_weekend() {
        // Thu 16:30 + 8h30m: step to Fri 16:30, +30m = 17:00, roll to Mon 09:00.
        assert_eq!(cal(&[]).project(at(thu(), 16, 30), 8.5).unwrap(), at(next_mon(), 9, 0));
    }

    // ── overflow handling ───────────────────────────────────────────────

    #[test]
    fn test_landing_exactly_on_window_end_rolls_over() {
        assert_eq!(cal(&[]).project(at(mon(), 16, 0), 1.0).unwrap(), at(tue(), 9, 0));
    }

    #[test]
    fn test_overflow_into_holiday() {
        assert_eq!(cal(&[tue()]).project(at(mon(), 16, 0), 2.0).unwrap(), at(wed(), 10, 0));
    }

    #[test]
    fn test_overflow_past_midnight_with_long_window() {
        // 08:00-20:00: Fri 19:00 + 11h = 1h Fri + 10h Mon = Mon 18:00.
        let long_day = BusinessCalendar::without_holidays(BusinessWindow::new(8, 0, 20, 0).unwrap());
        assert_eq!(long_day.project(at(fri(), 19, 0), 11.0).unwrap(), at(next_mon(), 18, 0));
    }

    #[test]
    fn test_fractional_hours() {
        assert_eq!(cal(&[]).project(at(mon(), 9, 0), 0.25).unwrap(), at(mon(), 9, 15));
    }

    #[test]
    fn test_results_are_working_instants() {
        let c = cal(&[wed()]);
        let origin = at(mon(), 15, 45);
        for quarter_hours in 0..200 {
            let result = c.project(origin, f64::from(quarter_hours) / 4.0).unwrap();
            assert!(c.is_working_instant(result), "{result} is not working time");
        }
    }

    #[test]
    fn test_monotonic_in_duration() {
        let c = cal(&[thu()]);
        let origin = at(tue(), 13, 20);
        let mut previous = c.project(origin, 0.0).unwrap();
        for tenth in 1..400 {
            let next = c.project(origin, f64::from(tenth) / 10.0).unwrap();
            assert!(next >= previous);
            previous = next;
        }
    }

    // ── errors ──────────────────────────────────────────────────────────

    #[test]
    fn test_negative_duration_rejected() {
        let err = cal(&[]).project(at(mon(), 10, 0), -1.0).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidArgument(_)));
    }

    #[test]
    fn test_non_finite_duration_rejected() {
        assert!(cal(&[]).project(at(mon(), 10, 0), f64::NAN).is_err());
        assert!(cal(&[]).project(at(mon(), 10, 0), f64::INFINITY).is_err());
    }

    #[test]
    fn test_huge_duration_rejected() {
        let err = cal(&[]).project(at(mon(), 10, 0), 1e15).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidArgument(_)));
    }
}
