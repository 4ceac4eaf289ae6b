// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::errors::BudgetError;

/// Rows without an explicit `Active` value are left out of the forecast.
pub const MISSING_ACTIVE: bool = false;
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Fallback when a `Day (1-31)` cell is missing or unreadable.
pub const DEFAULT_DAY_OF_MONTH: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum RuleKind {
    Income,
    #[default]
    Bill,
}

impl From<String> for RuleKind {
    fn from(label: String) -> Self {
        if label.trim().eq_ignore_ascii_case("income") {
            RuleKind::Income
        } else {
            RuleKind::Bill
        }
    }
}

impl RuleKind {
    /// Income keeps the entered amount; bills always leave the account.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            RuleKind::Income => amount,
            RuleKind::Bill => -amount.abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Frequency {
    Weekly,
    #[default]
    #[serde(rename = "Bi-Weekly")]
    BiWeekly,
}

impl From<String> for Frequency {
    fn from(label: String) -> Self {
        if label.trim().eq_ignore_ascii_case("weekly") {
            Frequency::Weekly
        } else {
            Frequency::BiWeekly
        }
    }
}

impl Frequency {
    pub fn interval_days(self) -> u64 {
        match self {
            Frequency::Weekly => 7,
            Frequency::BiWeekly => 14,
        }
    }
}

/// Fields shared by every editable budget row.
pub trait BudgetRow {
    fn active_flag(&self) -> Option<bool>;
    fn kind(&self) -> RuleKind;
    fn name(&self) -> &str;
    fn stored_category(&self) -> Option<&str>;
    fn amount(&self) -> Decimal;

    fn is_active(&self) -> bool {
        self.active_flag().unwrap_or(MISSING_ACTIVE)
    }

    fn signed_amount(&self) -> Decimal {
        self.kind().signed(self.amount())
    }

    /// Category as shown in a forecast: income is always filed under "Income".
    fn category(&self) -> &str {
        match self.kind() {
            RuleKind::Income => "Income",
            RuleKind::Bill => self
                .stored_category()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(UNCATEGORIZED),
        }
    }
}

macro_rules! budget_row {
    ($ty:ty) => {
        impl BudgetRow for $ty {
            fn active_flag(&self) -> Option<bool> {
                self.active
            }
            fn kind(&self) -> RuleKind {
                self.kind
            }
            fn name(&self) -> &str {
                &self.name
            }
            fn stored_category(&self) -> Option<&str> {
                self.category.as_deref()
            }
            fn amount(&self) -> Decimal {
                self.amount
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlyRule {
    #[serde(rename = "Active", default, deserialize_with = "lenient_flag")]
    pub active: Option<bool>,
    #[serde(rename = "Type", default, deserialize_with = "null_as_default")]
    pub kind: RuleKind,
    #[serde(rename = "Name", default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "Category", default, deserialize_with = "lenient_opt_text")]
    pub category: Option<String>,
    #[serde(rename = "Amount", default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    #[serde(rename = "Day (1-31)", default, deserialize_with = "lenient_day")]
    pub day_of_month: Option<i64>,
}

impl MonthlyRule {
    pub fn day(&self) -> i64 {
        self.day_of_month.unwrap_or(DEFAULT_DAY_OF_MONTH)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklyRule {
    #[serde(rename = "Active", default, deserialize_with = "lenient_flag")]
    pub active: Option<bool>,
    #[serde(rename = "Type", default, deserialize_with = "null_as_default")]
    pub kind: RuleKind,
    #[serde(rename = "Name", default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "Category", default, deserialize_with = "lenient_opt_text")]
    pub category: Option<String>,
    #[serde(rename = "Amount", default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    #[serde(rename = "Freq", default, deserialize_with = "null_as_default")]
    pub frequency: Frequency,
    #[serde(rename = "Day Name", default, deserialize_with = "lenient_text")]
    pub weekday: String,
}

impl WeeklyRule {
    pub fn weekday(&self) -> Weekday {
        crate::schedule::parse_weekday(&self.weekday)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OneTimeItem {
    #[serde(rename = "Active", default, deserialize_with = "lenient_flag")]
    pub active: Option<bool>,
    #[serde(rename = "Type", default, deserialize_with = "null_as_default")]
    pub kind: RuleKind,
    #[serde(rename = "Name", default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "Category", default, deserialize_with = "lenient_opt_text")]
    pub category: Option<String>,
    #[serde(rename = "Amount", default, deserialize_with = "lenient_amount")]
    pub amount: Decimal,
    #[serde(rename = "Date", default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
}

budget_row!(MonthlyRule);
budget_row!(WeeklyRule);
budget_row!(OneTimeItem);

/// A full budget: starting balance, start date and the three rule collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    #[serde(default)]
    pub seed: Option<Decimal>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub monthly: Vec<MonthlyRule>,
    #[serde(default)]
    pub weekly: Vec<WeeklyRule>,
    #[serde(default)]
    pub onetime: Vec<OneTimeItem>,
}

impl BudgetRecord {
    pub fn new(seed: Decimal, start_date: NaiveDate) -> Self {
        Self {
            seed: Some(seed),
            start_date,
            monthly: Vec::new(),
            weekly: Vec::new(),
            onetime: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Monthly,
    Weekly,
    OneTime,
}

impl FromStr for Collection {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Collection::Monthly),
            "weekly" => Ok(Collection::Weekly),
            "onetime" | "one-time" => Ok(Collection::OneTime),
            other => Err(BudgetError::UnknownCollection(other.to_string())),
        }
    }
}

impl Collection {
    pub fn key(self) -> &'static str {
        match self {
            Collection::Monthly => "monthly",
            Collection::Weekly => "weekly",
            Collection::OneTime => "onetime",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Bill,
    Seed,
}

impl From<RuleKind> for TransactionKind {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::Income => TransactionKind::Income,
            RuleKind::Bill => TransactionKind::Bill,
        }
    }
}

/// One dated, signed cash movement produced by expanding the budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    #[serde(with = "us_date")]
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub balance: Decimal,
    pub kind: TransactionKind,
}

impl ForecastRow {
    pub fn display_date(&self) -> String {
        self.date.format(us_date::FORMAT).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub months: u32,
    pub seed: Decimal,
    pub ending_balance: Decimal,
    pub minimum_balance: Decimal,
    pub average_monthly_surplus: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub rows: Vec<ForecastRow>,
    pub summary: ForecastSummary,
}

pub mod us_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%m/%d/%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

// Cells typed into a grid or exported from a spreadsheet arrive as whatever the
// tool felt like writing; everything below reads them without failing the row.

#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Cell>::deserialize(d)? {
        None => None,
        Some(Cell::Bool(b)) => Some(b),
        Some(Cell::Int(n)) => Some(n != 0),
        Some(Cell::Float(f)) => Some(f != 0.0),
        Some(Cell::Text(s)) => parse_flag(&s),
    })
}

pub fn parse_flag(s: &str) -> Option<bool> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "" => None,
        "true" | "yes" | "y" | "1" | "x" => Some(true),
        _ => Some(false),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_opt_text(d)?.unwrap_or_default())
}

fn lenient_opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Cell>::deserialize(d)? {
        None => None,
        Some(Cell::Bool(b)) => Some(b.to_string()),
        Some(Cell::Int(n)) => Some(n.to_string()),
        Some(Cell::Float(f)) => Some(f.to_string()),
        Some(Cell::Text(s)) if s.trim().is_empty() => None,
        Some(Cell::Text(s)) => Some(s),
    })
}

fn lenient_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    Ok(match Option::<Cell>::deserialize(d)? {
        Some(Cell::Int(n)) => Decimal::from(n),
        Some(Cell::Float(f)) => float_to_decimal(f),
        Some(Cell::Text(s)) => parse_amount(&s).unwrap_or(Decimal::ZERO),
        Some(Cell::Bool(_)) | None => Decimal::ZERO,
    })
}

/// Reads "1600", "1,600.00" or "$1,600.00".
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    Decimal::from_str(&cleaned).ok()
}

fn float_to_decimal(f: f64) -> Decimal {
    // Display gives the shortest repr that round-trips, so 1600.1 stays 1600.1.
    Decimal::from_str(&f.to_string())
        .or_else(|_| Decimal::try_from(f))
        .unwrap_or(Decimal::ZERO)
}

fn lenient_day<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Cell>::deserialize(d)? {
        Some(Cell::Int(n)) => Some(n),
        Some(Cell::Float(f)) if f.is_finite() => Some(f.trunc() as i64),
        Some(Cell::Text(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    })
}

fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(match Option::<Cell>::deserialize(d)? {
        Some(Cell::Text(s)) => parse_loose_date(&s),
        _ => None,
    })
}

/// Accepts `YYYY-MM-DD` (optionally followed by a time part) or `MM/DD/YYYY`.
pub fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, us_date::FORMAT))
        .ok()
}
