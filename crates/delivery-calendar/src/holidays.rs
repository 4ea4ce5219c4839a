//! Holiday periods, the resolved holiday set, and the sources that supply it.
//!
//! A [`HolidayPeriod`] is an inclusive date range as it would be stored in a
//! data store. The calendar core only ever sees a [`HolidaySet`]: the periods
//! expanded into individual dates. How the periods are fetched and how long
//! the expansion is cached is decided by a [`HolidaySource`].

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

// ── HolidayPeriod ───────────────────────────────────────────────────────────

/// A run of consecutive non-working dates, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayPeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HolidayPeriod {
    /// Build a period.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let period = Self {
            name: None,
            start,
            end,
        };
        period.validate()?;
        Ok(period)
    }

    /// A one-day period.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            name: None,
            start: date,
            end: date,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check the period bounds. Deserialized periods skip [`HolidayPeriod::new`].
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(CalendarError::InvalidRange(format!(
                "holiday period starts {} after it ends {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Every date in the period, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + Clone {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

// ── HolidaySet ──────────────────────────────────────────────────────────────

/// The set of non-working calendar dates used by a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `periods` into a set of dates. Overlapping periods are merged.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidRange`] for a period whose start is after its end.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use delivery_calendar::{HolidayPeriod, HolidaySet};
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2026, 12, day).unwrap();
    /// let set = HolidaySet::from_periods(&[HolidayPeriod::new(d(24), d(26)).unwrap()]).unwrap();
    /// assert_eq!(set.len(), 3);
    /// assert!(set.contains(d(25)));
    /// ```
    pub fn from_periods<'a, I>(periods: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a HolidayPeriod>,
    {
        let mut dates = BTreeSet::new();
        for period in periods {
            period.validate()?;
            dates.extend(period.dates());
        }
        Ok(Self { dates })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

impl Extend<NaiveDate> for HolidaySet {
    fn extend<T: IntoIterator<Item = NaiveDate>>(&mut self, iter: T) {
        self.dates.extend(iter);
    }
}

// ── Sources ─────────────────────────────────────────────────────────────────

/// Supplies the resolved holiday set for a calculation session.
pub trait HolidaySource: Send + Sync {
    fn resolve_holiday_dates(&self) -> Result<Arc<HolidaySet>>;
}

/// A fixed list of periods, expanded on every call.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidaySource {
    periods: Vec<HolidayPeriod>,
}

impl StaticHolidaySource {
    pub fn new(periods: Vec<HolidayPeriod>) -> Self {
        Self { periods }
    }

    pub fn periods(&self) -> &[HolidayPeriod] {
        &self.periods
    }
}

impl HolidaySource for StaticHolidaySource {
    fn resolve_holiday_dates(&self) -> Result<Arc<HolidaySet>> {
        let set = HolidaySet::from_periods(&self.periods)?;
        tracing::debug!(
            periods = self.periods.len(),
            dates = set.len(),
            "expanded holiday periods"
        );
        Ok(Arc::new(set))
    }
}

struct CacheEntry {
    set: Arc<HolidaySet>,
    resolved_at: Instant,
}

/// Memoizes another source's holiday set for at most `ttl`.
pub struct CachedHolidaySource<S> {
    inner: S,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl<S: HolidaySource> CachedHolidaySource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Resolve against an explicit clock reading.
    ///
    /// A cached set is reused while `now - resolved_at < ttl`; otherwise the
    /// inner source is queried again. Errors from the inner source are not
    /// cached.
    pub fn resolve_at(&self, now: Instant) -> Result<Arc<HolidaySet>> {
        {
            let guard = self.entry.read().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = guard.as_ref() {
                if now.saturating_duration_since(entry.resolved_at) < self.ttl {
                    return Ok(Arc::clone(&entry.set));
                }
            }
        }

        let set = self.inner.resolve_holiday_dates()?;
        tracing::debug!(dates = set.len(), "refreshed holiday cache");

        let mut guard = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(CacheEntry {
            set: Arc::clone(&set),
            resolved_at: now,
        });
        Ok(set)
    }

    /// Drop the cached set so the next call hits the inner source.
    pub fn invalidate(&self) {
        let mut guard = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: HolidaySource> HolidaySource for CachedHolidaySource<S> {
    fn resolve_holiday_dates(&self) -> Result<Arc<HolidaySet>> {
        self.resolve_at(Instant::now())
    }
}
