// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Date generators for recurring budget rules.
//!
//! Both generators are lazy iterators; calling the constructor again with the
//! same arguments replays the same dates.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::models::Frequency;

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// `day` in the given month, pulled back to the month's last day when it is too large.
fn on_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

fn month_after(date: NaiveDate, day: u32) -> Option<NaiveDate> {
    if date.month() == 12 {
        on_day(date.year() + 1, 1, day)
    } else {
        on_day(date.year(), date.month() + 1, day)
    }
}

/// One date per calendar month, on `day` or the month's last day if shorter.
#[derive(Debug, Clone)]
pub struct MonthlyDates {
    next: Option<NaiveDate>,
    end: NaiveDate,
    day: u32,
}

impl Iterator for MonthlyDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = month_after(current, self.day);
        Some(current)
    }
}

/// Dates in `[start, end]` falling on `day_of_month`.
///
/// Out-of-range days are clamped into 1..=31 before the per-month clamp, so
/// `0` behaves like `1` and `45` like `31`.
pub fn monthly_dates(start: NaiveDate, end: NaiveDate, day_of_month: i64) -> MonthlyDates {
    let day = day_of_month.clamp(1, 31) as u32;
    let first = on_day(start.year(), start.month(), day).and_then(|candidate| {
        if candidate < start {
            month_after(candidate, day)
        } else {
            Some(candidate)
        }
    });
    MonthlyDates {
        next: first,
        end,
        day,
    }
}

#[derive(Debug, Clone)]
pub struct WeeklyDates {
    next: Option<NaiveDate>,
    end: NaiveDate,
    step: Days,
}

impl Iterator for WeeklyDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.checked_add_days(self.step);
        Some(current)
    }
}

/// Dates in `[start, end]` on `weekday`, every one or two weeks from the first match.
pub fn weekly_dates(
    start: NaiveDate,
    end: NaiveDate,
    frequency: Frequency,
    weekday: Weekday,
) -> WeeklyDates {
    let ahead = (7 + weekday.num_days_from_monday() - start.weekday().num_days_from_monday()) % 7;
    WeeklyDates {
        next: start.checked_add_days(Days::new(u64::from(ahead))),
        end,
        step: Days::new(frequency.interval_days()),
    }
}

/// Unknown names fall back to Monday.
pub fn parse_weekday(name: &str) -> Weekday {
    name.trim().parse::<Weekday>().unwrap_or(Weekday::Mon)
}

pub fn is_known_weekday(name: &str) -> bool {
    name.trim().parse::<Weekday>().is_ok()
}
