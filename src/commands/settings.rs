// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{pretty_table, set_setting};
use anyhow::{bail, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-relay", sub)) => {
            let url = sub.get_one::<String>("url").unwrap().trim();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("Relay URL must be http(s), got '{}'", url);
            }
            set_setting(conn, "email_relay_url", url)?;
            println!("Email relay set; email channel enabled");
        }
        Some(("set-interval", sub)) => {
            let raw = sub.get_one::<String>("seconds").unwrap().trim();
            let secs: u64 = raw.parse()?;
            if secs == 0 {
                bail!("Sweep interval must be positive");
            }
            set_setting(conn, "sweep_interval_secs", &secs.to_string())?;
            println!("Sweep interval set to {}s", secs);
        }
        Some(("show", _)) => {
            let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
            let rows = stmt.query_map([], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (k, v) = row?;
                data.push(vec![k, v]);
            }
            println!("{}", pretty_table(&["Key", "Value"], data));
        }
        _ => {}
    }
    Ok(())
}
