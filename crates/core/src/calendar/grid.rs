//! Month calendar grid with daily net totals.

use std::collections::HashMap;

use chrono::{Datelike, Days};
use serde::Serialize;

use super::date_key::{LocalDateKey, MonthRef};
use crate::reports::DailyRollup;

/// One day cell of the calendar.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarCell {
    /// Day key.
    pub date: LocalDateKey,
    /// Day of month (1-31).
    pub day: u32,
    /// False for leading/trailing days of the adjacent months.
    pub in_month: bool,
    /// True for the caller's current local day.
    pub is_today: bool,
    /// Totals for the day; `None` when nothing was recorded.
    pub rollup: Option<DailyRollup>,
}

/// A Sunday-first grid of whole weeks covering one month.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarGrid {
    /// Year shown.
    pub year: i32,
    /// Month shown (1-12).
    pub month: u32,
    /// Heading, e.g. `October 2025`.
    pub title: String,
    /// Cells in display order; the length is a multiple of 7.
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    /// Lays out `month` and attaches the rollups of its days.
    ///
    /// Rollups outside the month are ignored; padding days never carry totals.
    #[must_use]
    pub fn build(month: MonthRef, rollups: &[DailyRollup], today: LocalDateKey) -> Self {
        let by_day: HashMap<LocalDateKey, &DailyRollup> =
            rollups.iter().map(|r| (r.date, r)).collect();

        let (first, last) = month.range();
        let leading = u64::from(first.date().weekday().num_days_from_sunday());
        let trailing = 6 - u64::from(last.date().weekday().num_days_from_sunday());
        let start = first.date() - Days::new(leading);
        let end = last.date() + Days::new(trailing);

        let cells = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| {
                let key = LocalDateKey::from_date(date);
                let in_month = month.contains(key);
                CalendarCell {
                    date: key,
                    day: date.day(),
                    in_month,
                    is_today: key == today,
                    rollup: in_month
                        .then(|| by_day.get(&key).map(|r| (*r).clone()))
                        .flatten(),
                }
            })
            .collect();

        Self {
            year: month.year(),
            month: month.month(),
            title: format!("{} {}", month.name(), month.year()),
            cells,
        }
    }

    /// Iterates the grid one week (7 cells) at a time.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(7)
    }
}
