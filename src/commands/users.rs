// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{bail, Result};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            if name.is_empty() {
                bail!("User name must not be empty");
            }
            let email = sub
                .get_one::<String>("email")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty());
            conn.execute(
                "INSERT INTO users(name, email) VALUES (?1, ?2)",
                params![name, email],
            )?;
            println!("Added user '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare("SELECT name, COALESCE(email,'') FROM users ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, e) = row?;
                data.push(vec![n, e]);
            }
            println!("{}", pretty_table(&["User", "Email"], data));
        }
        Some(("set-email", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let email = sub.get_one::<String>("email").unwrap().trim();
            let changed = conn.execute(
                "UPDATE users SET email=?1 WHERE name=?2",
                params![email, name],
            )?;
            if changed == 0 {
                bail!("User '{}' not found", name);
            }
            println!("Email for '{}' set to {}", name, email);
        }
        _ => {}
    }
    Ok(())
}
