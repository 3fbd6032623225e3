// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Days, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

/// The calendar day an evaluation is computed for.
///
/// Captured once per evaluation and handed to every engine function so the
/// state, risk and behavior results all agree on what "today" is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ReportingDay(NaiveDate);

impl ReportingDay {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Current date in the reporting zone given as a fixed UTC offset.
    pub fn now(offset: FixedOffset) -> Self {
        Self(Utc::now().with_timezone(&offset).date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// 1-indexed day of the month.
    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.0.year(), self.0.month())
    }

    pub fn in_same_month(&self, date: NaiveDate) -> bool {
        date.year() == self.0.year() && date.month() == self.0.month()
    }

    /// Inclusive `(first, last)` bounds of the `len` days ending today.
    pub fn trailing_window(&self, len: u32) -> (NaiveDate, NaiveDate) {
        let back = u64::from(len.max(1) - 1);
        let start = self
            .0
            .checked_sub_days(Days::new(back))
            .unwrap_or(NaiveDate::MIN);
        (start, self.0)
    }

    /// `YYYY-MM` of the reporting day.
    pub fn month_key(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }
}

impl From<NaiveDate> for ReportingDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}
