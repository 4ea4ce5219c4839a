//! # delivery-calendar
//!
//! Business-calendar arithmetic for delivery commitments.
//!
//! Given a daily working window, weekends off, and a set of holiday dates,
//! this crate answers two questions: when is an order placed at time `T`
//! ready after `H` working hours, and how much working time elapsed between
//! two timestamps. All timestamps are naive local datetimes in one zone.
//!
//! ## Modules
//!
//! - [`window`] - The daily working window (`HH:MM-HH:MM`)
//! - [`holidays`] - Holiday periods, the resolved holiday set, and cached sources
//! - [`calendar`] - Working-day predicates and the day-skipping primitive
//! - [`projector`] - Forward projection of a timestamp by working time
//! - [`duration`] - Working time elapsed between two timestamps
//! - [`error`] - Error types

pub mod calendar;
pub mod duration;
pub mod error;
pub mod holidays;
pub mod projector;
pub mod window;

pub use calendar::{BusinessCalendar, MAX_LOOKAHEAD_DAYS};
pub use duration::WindowStarts;
pub use error::CalendarError;
pub use holidays::{
    CachedHolidaySource, HolidayPeriod, HolidaySet, HolidaySource, StaticHolidaySource,
};
pub use window::BusinessWindow;
