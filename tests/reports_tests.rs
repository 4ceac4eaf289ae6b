// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use flowcast::cli;
use flowcast::commands::budget::starter_record;
use flowcast::commands::doctor::diagnose;
use flowcast::commands::forecast::run;
use flowcast::commands::reports::{monthly_flows, spend_by_category_rows};
use flowcast::db;
use flowcast::forecast::forecast;
use flowcast::models::{BudgetRecord, MonthlyRule, OneTimeItem, RuleKind, WeeklyRule};
use flowcast::utils::{fmt_money, resolve_record};
use rstest::rstest;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn cashflow_groups_by_month() {
    let f = forecast(&starter_record(dec("3500"), d(2026, 1, 1))).unwrap();
    let flows = monthly_flows(&f.rows);
    assert_eq!(flows.len(), 12);

    let jan = &flows[0];
    assert_eq!(jan.month, "2026-01");
    // three bi-weekly Friday paydays, four Mondays of gas, both rents
    assert_eq!(jan.income, dec("8400"));
    assert_eq!(jan.expense, dec("1960"));
    assert_eq!(jan.net, dec("6440"));
    assert_eq!(jan.closing_balance, dec("9940"));

    assert_eq!(flows.last().unwrap().month, "2026-12");
    assert_eq!(
        flows.last().unwrap().closing_balance,
        f.summary.ending_balance
    );
}

#[test]
fn spend_by_category_covers_bills_only() {
    let f = forecast(&starter_record(dec("3500"), d(2026, 1, 1))).unwrap();
    let spend = spend_by_category_rows(&f.rows);
    assert_eq!(spend.len(), 2);
    assert_eq!(spend[0].category, "Housing");
    assert_eq!(spend[0].spent, dec("21600"));
    assert_eq!(spend[0].count, 24);
    assert_eq!(spend[1].category, "Auto");
    assert_eq!(spend[1].spent, dec("2080"));
    assert_eq!(spend[1].count, 52);
}

#[test]
fn doctor_flags_rows_that_get_defaulted_or_skipped() {
    let mut record = BudgetRecord::new(dec("100"), d(2026, 3, 1));
    record.monthly = vec![
        MonthlyRule {
            active: None,
            name: "Gym".into(),
            amount: dec("30"),
            day_of_month: Some(45),
            ..Default::default()
        },
        MonthlyRule {
            active: Some(true),
            name: "Phone".into(),
            amount: dec("-40"),
            day_of_month: None,
            ..Default::default()
        },
    ];
    record.weekly = vec![WeeklyRule {
        active: Some(true),
        kind: RuleKind::Income,
        name: "Tips".into(),
        amount: Decimal::ZERO,
        weekday: "Caturday".into(),
        ..Default::default()
    }];
    record.onetime = vec![
        OneTimeItem {
            active: Some(true),
            name: "Old".into(),
            amount: dec("5"),
            date: Some(d(2026, 2, 1)),
            ..Default::default()
        },
        OneTimeItem {
            active: Some(true),
            name: "Undated".into(),
            amount: dec("5"),
            date: None,
            ..Default::default()
        },
    ];

    let issues: Vec<(&str, &str, usize)> = diagnose(&record)
        .iter()
        .map(|f| (f.issue, f.collection, f.row))
        .collect();
    assert_eq!(
        issues,
        vec![
            ("active_missing", "monthly", 1),
            ("day_clamped", "monthly", 1),
            ("negative_amount", "monthly", 2),
            ("day_missing", "monthly", 2),
            ("zero_amount", "weekly", 1),
            ("weekday_fallback", "weekly", 1),
            ("outside_horizon", "onetime", 1),
            ("date_missing", "onetime", 2),
        ]
    );
}

#[test]
fn doctor_is_quiet_for_the_starter_budget() {
    assert!(diagnose(&starter_record(dec("3500"), d(2026, 3, 1))).is_empty());
}

#[rstest]
#[case("1234.5", "$1,234.50")]
#[case("-5000", "-$5,000.00")]
#[case("0", "$0.00")]
#[case("-0.001", "$0.00")]
#[case("1000000", "$1,000,000.00")]
#[case("999.999", "$1,000.00")]
fn money_formatting(#[case] amount: &str, #[case] expected: &str) {
    assert_eq!(fmt_money(&dec(amount), "$"), expected);
}

#[test]
fn profile_source_with_overrides_feeds_cached_run() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    db::save_profile(&conn, "home", &starter_record(dec("3500"), d(2026, 3, 1))).unwrap();

    let matches = cli::build_cli().get_matches_from([
        "flowcast", "forecast", "--profile", "home", "--seed", "-100", "--start", "2026-07-01",
    ]);
    let Some(("forecast", sub)) = matches.subcommand() else {
        panic!("no forecast subcommand");
    };
    let record = resolve_record(&conn, sub).unwrap();
    assert_eq!(record.seed, Some(dec("-100")));
    assert_eq!(record.start_date, d(2026, 7, 1));

    let first = run(&conn, &record, false).unwrap().unwrap();
    let second = run(&conn, &record, false).unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(first, forecast(&record).unwrap());
    assert_eq!(first.rows[0].amount, dec("-100"));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM forecast_cache", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);

    let uncached = run(&conn, &record, true).unwrap().unwrap();
    assert_eq!(uncached, first);
}

#[test]
fn missing_budget_source_is_an_error() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let matches = cli::build_cli().get_matches_from(["flowcast", "doctor"]);
    let Some(("doctor", sub)) = matches.subcommand() else {
        panic!("no doctor subcommand");
    };
    assert!(resolve_record(&conn, sub).is_err());
}
