//! window.rs
//! Month keys and the date window covered by a run.
//!
//! The window always ends with the last *complete* month before `as_of` and
//! spans `months` consecutive months, oldest first.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// `None` unless `month` is in 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.next().first_day()?.pred_opt()
    }
}

/// The month before the one containing `today`.
pub fn last_complete_month(today: NaiveDate) -> MonthKey {
    MonthKey::of(today).prev()
}

/// `count` months ending at `end`, oldest first.
pub fn month_sequence(end: MonthKey, count: u32) -> Vec<MonthKey> {
    let mut out = Vec::with_capacity(count as usize);
    let mut m = end;
    for _ in 0..count {
        out.push(m);
        m = m.prev();
    }
    out.reverse();
    out
}

/// Inclusive `YYYYMMDD` bounds of a run window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: String,
    pub end: String,
}

impl DateWindow {
    /// First day of the first month to the last day of the last month.
    /// `None` for an empty month list.
    pub fn for_months(months: &[MonthKey]) -> Option<Self> {
        let start = months.first()?.first_day()?;
        let end = months.last()?.last_day()?;
        Some(Self {
            start: start.format("%Y%m%d").to_string(),
            end: end.format("%Y%m%d").to_string(),
        })
    }
}
