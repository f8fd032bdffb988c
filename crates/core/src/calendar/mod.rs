//! Calendar-day keys, month ranges and the month grid.

pub mod date_key;
pub mod error;
pub mod grid;

pub use date_key::{LocalDateKey, MonthRef, month_range, to_local_key, to_local_key_in};
pub use error::CalendarError;
pub use grid::{CalendarCell, CalendarGrid};
