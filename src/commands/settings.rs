// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::db;

pub const KNOWN_KEYS: &[&str] = &["currency_symbol"];

fn check_key(key: &str) -> Result<()> {
    if KNOWN_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(anyhow!(
            "Unknown setting '{}' (known: {})",
            key,
            KNOWN_KEYS.join(", ")
        ))
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap().trim();
            check_key(key)?;
            db::set_setting(conn, key, value)?;
            println!("{} = {}", key, value);
        }
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            check_key(key)?;
            let value = match key {
                "currency_symbol" => db::currency_symbol(conn)?,
                _ => db::get_setting(conn, key)?.unwrap_or_default(),
            };
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
