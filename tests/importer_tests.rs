// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use flowcast::commands::budget::starter_record;
use flowcast::commands::exporter::save_record;
use flowcast::commands::importer::{self, read_record, read_rows};
use flowcast::errors::BudgetError;
use flowcast::models::{BudgetRow, MonthlyRule, WeeklyRule};
use flowcast::cli;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn budget_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("budget.json");
    let record = starter_record(Decimal::from(3500), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    save_record(&path, &record).unwrap();
    path
}

fn run_import(kind: &str, rows: &Path, config: &Path) -> anyhow::Result<()> {
    let rows = rows.to_string_lossy().to_string();
    let config = config.to_string_lossy().to_string();
    let matches = cli::build_cli().get_matches_from([
        "flowcast", "import", "rows", "--kind", kind, "--path", &rows, "--config", &config,
    ]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn csv_rows_replace_the_monthly_collection() {
    let dir = tempdir().unwrap();
    let config = budget_file(&dir);
    let csv_path = dir.path().join("monthly.csv");
    std::fs::write(
        &csv_path,
        "Active,Type,Name,Category,Amount,Day (1-31)\n\
         True,Bill,Internet,Utilities,\"$1,065.00\",20\n\
         ,Income,Side gig,,250,5\n",
    )
    .unwrap();

    run_import("monthly", &csv_path, &config).unwrap();

    let record = read_record(&config).unwrap();
    assert_eq!(record.monthly.len(), 2);
    let internet = &record.monthly[0];
    assert_eq!(internet.active, Some(true));
    assert_eq!(internet.amount, Decimal::from(1065));
    assert_eq!(internet.day(), 20);
    let gig = &record.monthly[1];
    assert_eq!(gig.active, None);
    assert_eq!(gig.category, None);
    assert_eq!(gig.signed_amount(), Decimal::from(250));
    // other collections untouched
    assert_eq!(record.weekly.len(), 3);
}

#[test]
fn json_rows_replace_the_weekly_collection() {
    let dir = tempdir().unwrap();
    let config = budget_file(&dir);
    let json_path = dir.path().join("weekly.json");
    std::fs::write(
        &json_path,
        r#"[{"Active": true, "Type": "Bill", "Name": "Lunch", "Category": "Food", "Amount": 12.5, "Freq": "Weekly", "Day Name": "Wednesday"}]"#,
    )
    .unwrap();

    run_import("weekly", &json_path, &config).unwrap();

    let record = read_record(&config).unwrap();
    assert_eq!(record.weekly.len(), 1);
    assert_eq!(record.weekly[0].weekday(), chrono::Weekday::Wed);
    assert_eq!(record.monthly.len(), 2);
}

#[test]
fn malformed_row_file_leaves_budget_untouched() {
    let dir = tempdir().unwrap();
    let config = budget_file(&dir);
    let before = std::fs::read_to_string(&config).unwrap();
    let json_path = dir.path().join("weekly.json");
    std::fs::write(&json_path, r#"{"Name": "not a list"}"#).unwrap();

    assert!(run_import("weekly", &json_path, &config).is_err());
    assert_eq!(std::fs::read_to_string(&config).unwrap(), before);
}

#[test]
fn unknown_collection_and_extension_are_errors() {
    let dir = tempdir().unwrap();
    let config = budget_file(&dir);
    let csv_path = dir.path().join("rows.csv");
    std::fs::write(&csv_path, "Active,Type\n").unwrap();
    let err = run_import("yearly", &csv_path, &config).unwrap_err();
    assert!(err.to_string().contains("Unknown collection"));

    let txt = dir.path().join("rows.txt");
    std::fs::write(&txt, "").unwrap();
    assert!(matches!(
        read_rows::<WeeklyRule>(&txt),
        Err(BudgetError::UnsupportedFormat(_))
    ));
}

#[test]
fn csv_with_header_only_yields_no_rows() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("monthly.csv");
    std::fs::write(&csv_path, "Active,Type,Name,Category,Amount,Day (1-31)\n").unwrap();
    let rows: Vec<MonthlyRule> = read_rows(&csv_path).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn csv_amounts_keep_every_digit() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("onetime.csv");
    std::fs::write(
        &csv_path,
        "Active,Type,Name,Category,Amount,Date\n\
         yes,Income,Estate,Legal,1234567890123456789.12,2026-08-01\n\
         no,Bill,Coffee,Food,0.10,08/02/2026\n",
    )
    .unwrap();
    let rows: Vec<flowcast::models::OneTimeItem> = read_rows(&csv_path).unwrap();
    assert_eq!(rows[0].amount, "1234567890123456789.12".parse::<Decimal>().unwrap());
    assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2026, 8, 1));
    assert_eq!(rows[1].active, Some(false));
    assert_eq!(rows[1].amount, Decimal::new(10, 2));
    assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2026, 8, 2));
}
