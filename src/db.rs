// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::cache::ForecastStore;
use crate::errors::{BudgetError, BudgetResult};
use crate::models::{BudgetRecord, Forecast};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Flowcast", "flowcast"));

pub const DB_ENV: &str = "FLOWCAST_DB";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

pub fn db_path() -> Result<PathBuf> {
    if let Some(custom) = std::env::var_os(DB_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(custom));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("flowcast.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS profiles(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        payload TEXT NOT NULL, -- BudgetRecord JSON
        saved_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS forecast_cache(
        fingerprint TEXT PRIMARY KEY,
        payload TEXT NOT NULL, -- Forecast JSON
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn currency_symbol(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "currency_symbol")?
        .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()))
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileInfo {
    pub name: String,
    pub start_date: String,
    pub saved_at: String,
}

pub fn save_profile(conn: &Connection, name: &str, record: &BudgetRecord) -> BudgetResult<()> {
    let payload = serde_json::to_string(record)?;
    conn.execute(
        "INSERT INTO profiles(name, payload) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET payload=excluded.payload, saved_at=datetime('now')",
        params![name, payload],
    )?;
    Ok(())
}

pub fn load_profile(conn: &Connection, name: &str) -> BudgetResult<BudgetRecord> {
    let payload: Option<String> = conn
        .query_row(
            "SELECT payload FROM profiles WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    let payload = payload.ok_or_else(|| BudgetError::ProfileNotFound(name.to_string()))?;
    Ok(serde_json::from_str(&payload)?)
}

pub fn list_profiles(conn: &Connection) -> BudgetResult<Vec<ProfileInfo>> {
    let mut stmt = conn.prepare(
        "SELECT name, json_extract(payload, '$.start_date'), saved_at FROM profiles ORDER BY name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(ProfileInfo {
            name: r.get(0)?,
            start_date: r.get::<_, Option<String>>(1)?.unwrap_or_default(),
            saved_at: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn remove_profile(conn: &Connection, name: &str) -> BudgetResult<()> {
    let n = conn.execute("DELETE FROM profiles WHERE name=?1", params![name])?;
    if n == 0 {
        return Err(BudgetError::ProfileNotFound(name.to_string()));
    }
    Ok(())
}

/// Forecast cache kept in the `forecast_cache` table.
pub struct SqliteCache<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCache<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn clear(&self) -> BudgetResult<usize> {
        Ok(self.conn.execute("DELETE FROM forecast_cache", [])?)
    }
}

impl ForecastStore for SqliteCache<'_> {
    fn get(&self, fingerprint: &str) -> BudgetResult<Option<Forecast>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM forecast_cache WHERE fingerprint=?1",
                params![fingerprint],
                |r| r.get(0),
            )
            .optional()?;
        match payload {
            Some(p) => Ok(Some(serde_json::from_str(&p)?)),
            None => Ok(None),
        }
    }

    fn put(&mut self, fingerprint: &str, forecast: &Forecast) -> BudgetResult<()> {
        self.conn.execute(
            "INSERT INTO forecast_cache(fingerprint, payload) VALUES (?1, ?2)
             ON CONFLICT(fingerprint) DO UPDATE SET payload=excluded.payload, created_at=datetime('now')",
            params![fingerprint, serde_json::to_string(forecast)?],
        )?;
        Ok(())
    }
}
