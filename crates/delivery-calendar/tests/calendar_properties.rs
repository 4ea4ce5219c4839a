//! Property-based tests for the calendar, projection, and duration operations.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use delivery_calendar::{BusinessCalendar, BusinessWindow, HolidaySet};
use proptest::prelude::*;

fn epoch() -> NaiveDate {
    // A Monday.
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

fn timestamp(day: u64, minute_of_day: u32) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(minute_of_day / 60, minute_of_day % 60, 0).unwrap();
    (epoch() + Days::new(day)).and_time(time)
}

/// A window of at least half an hour, anywhere in the day.
fn window_strategy() -> impl Strategy<Value = BusinessWindow> {
    (0u32..1410)
        .prop_flat_map(|start| (Just(start), (start + 30)..1440))
        .prop_map(|(start, end)| {
            BusinessWindow::new(start / 60, start % 60, end / 60, end % 60).unwrap()
        })
}

/// Up to a dozen holidays scattered over the first few months.
fn holidays_strategy() -> impl Strategy<Value = HolidaySet> {
    prop::collection::vec(0u64..120, 0..12)
        .prop_map(|offsets| offsets.into_iter().map(|d| epoch() + Days::new(d)).collect::<HolidaySet>())
}

fn calendar_strategy() -> impl Strategy<Value = BusinessCalendar> {
    (window_strategy(), holidays_strategy())
        .prop_map(|(window, holidays)| BusinessCalendar::new(window, holidays))
}

proptest! {
    #[test]
    fn test_weekends_are_never_working(
        calendar in calendar_strategy(),
        week in 0u64..200,
        sunday in any::<bool>(),
        minute in 0u32..1440,
    ) {
        // epoch + 5 is a Saturday.
        let day = week * 7 + 5 + u64::from(sunday);
        prop_assert!(!calendar.is_working_instant(timestamp(day, minute)));
    }

    #[test]
    fn test_skip_is_idempotent(
        calendar in calendar_strategy(),
        day in 0u64..150,
        minute in 0u32..1440,
        reset in any::<bool>(),
    ) {
        let once = calendar.skip_non_working_days(timestamp(day, minute), reset).unwrap();
        let twice = calendar.skip_non_working_days(once, reset).unwrap();
        prop_assert_eq!(once, twice);
        prop_assert!(calendar.is_working_day(once.date()));
    }

    #[test]
    fn test_projection_lands_on_working_time(
        calendar in calendar_strategy(),
        day in 0u64..100,
        minute in 0u32..1440,
        duration_minutes in 0u32..20_000,
    ) {
        let origin = timestamp(day, minute);
        let delivery = calendar.project(origin, f64::from(duration_minutes) / 60.0).unwrap();
        prop_assert!(calendar.is_working_instant(delivery), "{} is not working time", delivery);
        prop_assert!(delivery >= origin);
    }

    #[test]
    fn test_projection_is_monotonic(
        calendar in calendar_strategy(),
        day in 0u64..100,
        minute in 0u32..1440,
        a in 0u32..20_000,
        b in 0u32..20_000,
    ) {
        let origin = timestamp(day, minute);
        let (shorter, longer) = if a <= b { (a, b) } else { (b, a) };
        let first = calendar.project(origin, f64::from(shorter) / 60.0).unwrap();
        let second = calendar.project(origin, f64::from(longer) / 60.0).unwrap();
        prop_assert!(first <= second, "{} > {}", first, second);
    }

    #[test]
    fn test_duration_inverts_projection(
        calendar in calendar_strategy(),
        day in 0u64..100,
        minute in 0u32..1440,
        duration_minutes in 0u32..20_000,
    ) {
        let origin = calendar.next_working_instant(timestamp(day, minute)).unwrap();
        let hours = f64::from(duration_minutes) / 60.0;
        let delivery = calendar.project(origin, hours).unwrap();
        let measured = calendar.duration_in_working_hours(origin, delivery).unwrap();
        prop_assert!((measured - hours).abs() < 1e-6, "measured {} for {} hours", measured, hours);
    }

    #[test]
    fn test_duration_is_never_negative(
        calendar in calendar_strategy(),
        day in 0u64..100,
        minute in 0u32..1440,
        span_minutes in 0u32..20_000,
    ) {
        let start = timestamp(day, minute);
        let end = start + chrono::TimeDelta::minutes(i64::from(span_minutes));
        let hours = calendar.duration_in_working_hours(start, end).unwrap();
        prop_assert!(hours >= 0.0);
        let days = calendar.duration_in_working_days(start, end).unwrap();
        let workday_hours = calendar.workday_duration_minutes() as f64 / 60.0;
        prop_assert!((days * workday_hours - hours).abs() < 1e-9);
    }
}
