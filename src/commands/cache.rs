// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::db::SqliteCache;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("clear", _)) = m.subcommand() {
        let removed = SqliteCache::new(conn).clear()?;
        println!("Cleared {} cached forecasts", removed);
    }
    Ok(())
}
