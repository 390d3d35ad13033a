//! Reference clock. Owns "today" for every analytics computation.
//!
//! RULE: Nothing in the engine reads the wall clock directly.
//! Every status, recency and segment calculation is relative to the
//! `ReferenceClock` passed in, so a fixed clock gives reproducible output.

use crate::{
    error::{AnalyticsError, AnalyticsResult},
    types::Days,
};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceClock {
    pub today: NaiveDate,
}

impl ReferenceClock {
    /// Read the local wall clock once.
    pub fn system() -> Self {
        Self { today: Local::now().date_naive() }
    }

    pub fn fixed(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Pin the clock to a `YYYY-MM-DD` date.
    pub fn parse(value: &str) -> AnalyticsResult<Self> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Self::fixed)
            .map_err(|_| AnalyticsError::InvalidDate { value: value.to_string() })
    }

    /// The calendar month `offset` months before today (0 = this month).
    pub fn month(&self, offset: u32) -> MonthWindow {
        MonthWindow::containing(self.today).months_back(offset)
    }

    pub fn this_month(&self) -> MonthWindow { self.month(0) }
    pub fn last_month(&self) -> MonthWindow { self.month(1) }
    pub fn two_months_ago(&self) -> MonthWindow { self.month(2) }

    /// Signed whole days from `date` to today (negative for future dates).
    pub fn days_since(&self, date: NaiveDate) -> Days {
        days_between(date, self.today)
    }

    pub fn months_since(&self, date: NaiveDate) -> i32 {
        months_between(date, self.today)
    }

    /// A clock pinned to the last day of the month `offset` months back.
    /// Used to replay history as of a past month end.
    pub fn at_month_end(&self, offset: u32) -> Self {
        Self::fixed(self.month(offset).last)
    }
}

/// An inclusive calendar month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthWindow {
    pub first: NaiveDate,
    pub last:  NaiveDate,
}

impl MonthWindow {
    pub fn containing(date: NaiveDate) -> Self {
        let first = date - Duration::days(i64::from(date.day0()));
        // Day 31 past the 1st always lands in the following month.
        let probe = first + Duration::days(31);
        let next_first = probe - Duration::days(i64::from(probe.day0()));
        Self {
            first,
            last: next_first - Duration::days(1),
        }
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.first - Duration::days(1))
    }

    pub fn months_back(&self, offset: u32) -> Self {
        (0..offset).fold(*self, |window, _| window.previous())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last
    }

    /// Short label such as `2026-10`.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.first.year(), self.first.month())
    }
}

/// Signed whole-day difference `later - earlier`.
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> Days {
    (later - earlier).num_days()
}

/// Whole calendar months from `earlier` to `later`.
///
/// A month only counts once the day-of-month is reached again, except that
/// the last day of a month completes a month started on a later day
/// (Jan 31 -> Feb 28 is one month). Negative when `later < earlier`.
pub fn months_between(earlier: NaiveDate, later: NaiveDate) -> i32 {
    if later < earlier {
        return -months_between(later, earlier);
    }
    let mut months = (later.year() - earlier.year()) * 12
        + later.month() as i32
        - earlier.month() as i32;
    let later_is_month_end = MonthWindow::containing(later).last == later;
    if later.day() < earlier.day() && !later_is_month_end {
        months -= 1;
    }
    months.max(0)
}
