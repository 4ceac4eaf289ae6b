// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate, Weekday};
use flowcast::models::Frequency;
use flowcast::schedule::{days_in_month, monthly_dates, parse_weekday, weekly_dates};
use rstest::rstest;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month() as i32
}

#[rstest]
#[case(2026, 2, 28)]
#[case(2028, 2, 29)]
#[case(2100, 2, 28)]
#[case(2000, 2, 29)]
#[case(2026, 4, 30)]
#[case(2026, 12, 31)]
fn days_in_month_follows_calendar(#[case] y: i32, #[case] m: u32, #[case] expected: u32) {
    assert_eq!(days_in_month(y, m), expected);
}

#[rstest]
#[case(d(2026, 1, 1), 1)]
#[case(d(2026, 1, 15), 31)]
#[case(d(2026, 3, 10), 5)]
#[case(d(2028, 1, 31), 30)]
#[case(d(2026, 6, 30), 29)]
#[case(d(2026, 2, 28), 31)]
fn monthly_dates_hit_clamped_day_once_per_month(#[case] start: NaiveDate, #[case] day: i64) {
    let end = d(start.year(), 12, 31);
    let dates: Vec<NaiveDate> = monthly_dates(start, end, day).collect();
    assert!(!dates.is_empty());
    for date in &dates {
        assert_eq!(
            date.day(),
            (day as u32).min(days_in_month(date.year(), date.month()))
        );
        assert!(*date >= start && *date <= end);
    }
    for pair in dates.windows(2) {
        assert_eq!(month_index(pair[1]) - month_index(pair[0]), 1);
    }
}

#[test]
fn day_31_lands_on_last_day_of_february() {
    let non_leap: Vec<NaiveDate> = monthly_dates(d(2026, 1, 1), d(2026, 12, 31), 31).collect();
    assert_eq!(non_leap.len(), 12);
    assert_eq!(non_leap[0], d(2026, 1, 31));
    assert_eq!(non_leap[1], d(2026, 2, 28));
    assert_eq!(non_leap[2], d(2026, 3, 31));
    assert_eq!(non_leap[3], d(2026, 4, 30));

    let leap: Vec<NaiveDate> = monthly_dates(d(2028, 1, 1), d(2028, 12, 31), 31).collect();
    assert_eq!(leap[1], d(2028, 2, 29));
}

#[test]
fn day_before_start_rolls_to_next_month() {
    let dates: Vec<NaiveDate> = monthly_dates(d(2026, 3, 10), d(2026, 6, 30), 5).collect();
    assert_eq!(
        dates,
        vec![d(2026, 4, 5), d(2026, 5, 5), d(2026, 6, 5)]
    );
}

#[test]
fn day_equal_to_start_is_included() {
    let mut dates = monthly_dates(d(2026, 3, 5), d(2026, 12, 31), 5);
    assert_eq!(dates.next(), Some(d(2026, 3, 5)));
}

#[test]
fn end_date_is_inclusive() {
    let dates: Vec<NaiveDate> = monthly_dates(d(2026, 1, 1), d(2026, 3, 15), 15).collect();
    assert_eq!(dates.last(), Some(&d(2026, 3, 15)));
}

#[rstest]
#[case(0, 1)]
#[case(-7, 1)]
#[case(45, 31)]
#[case(i64::MAX, 31)]
fn out_of_range_day_degrades_to_nearest_valid(#[case] day: i64, #[case] as_day: i64) {
    let start = d(2026, 1, 1);
    let end = d(2026, 12, 31);
    let got: Vec<NaiveDate> = monthly_dates(start, end, day).collect();
    let want: Vec<NaiveDate> = monthly_dates(start, end, as_day).collect();
    assert_eq!(got, want);
}

#[test]
fn monthly_generator_is_empty_when_nothing_fits() {
    assert_eq!(monthly_dates(d(2026, 12, 15), d(2026, 12, 31), 1).count(), 0);
    assert_eq!(monthly_dates(d(2026, 5, 1), d(2026, 4, 1), 1).count(), 0);
}

#[test]
fn generators_replay_identically() {
    let monthly = monthly_dates(d(2026, 1, 1), d(2026, 12, 31), 15);
    let again = monthly.clone();
    assert_eq!(monthly.collect::<Vec<_>>(), again.collect::<Vec<_>>());

    let weekly = weekly_dates(d(2026, 1, 1), d(2026, 12, 31), Frequency::Weekly, Weekday::Wed);
    let a: Vec<NaiveDate> = weekly.clone().collect();
    let b: Vec<NaiveDate> = weekly.collect();
    assert_eq!(a, b);
}

#[test]
fn weekly_friday_from_a_tuesday() {
    let start = d(2026, 3, 10);
    assert_eq!(start.weekday(), Weekday::Tue);
    let dates: Vec<NaiveDate> =
        weekly_dates(start, d(2026, 12, 31), Frequency::Weekly, Weekday::Fri).collect();
    assert_eq!(dates[0], d(2026, 3, 13));
    assert_eq!(dates[1], d(2026, 3, 20));
    assert_eq!(dates.last(), Some(&d(2026, 12, 25)));
    assert_eq!(dates.len(), 42);
}

#[test]
fn weekly_start_on_target_day_is_first_occurrence() {
    let start = d(2026, 3, 13);
    let mut dates = weekly_dates(start, d(2026, 12, 31), Frequency::BiWeekly, Weekday::Fri);
    assert_eq!(dates.next(), Some(start));
    assert_eq!(dates.next(), Some(d(2026, 3, 27)));
}

#[rstest]
fn weekly_dates_keep_weekday_and_spacing(
    #[values(
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun
    )]
    weekday: Weekday,
    #[values(Frequency::Weekly, Frequency::BiWeekly)] frequency: Frequency,
) {
    let start = d(2026, 2, 18);
    let end = d(2026, 12, 31);
    let dates: Vec<NaiveDate> = weekly_dates(start, end, frequency, weekday).collect();
    assert!(!dates.is_empty());
    assert!((dates[0] - start).num_days() < 7);
    for date in &dates {
        assert_eq!(date.weekday(), weekday);
        assert!(*date <= end);
    }
    for pair in dates.windows(2) {
        assert_eq!(
            (pair[1] - pair[0]).num_days() as u64,
            frequency.interval_days()
        );
    }
}

#[rstest]
#[case("Friday", Weekday::Fri)]
#[case("  sunday ", Weekday::Sun)]
#[case("WED", Weekday::Wed)]
#[case("Funday", Weekday::Mon)]
#[case("", Weekday::Mon)]
fn weekday_names_fall_back_to_monday(#[case] name: &str, #[case] expected: Weekday) {
    assert_eq!(parse_weekday(name), expected);
}
