// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_user, pretty_table};
use anyhow::{bail, Result};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user = sub.get_one::<String>("user").unwrap();
            let label = sub.get_one::<String>("label").unwrap().trim().to_string();
            let url = sub.get_one::<String>("url").unwrap().trim().to_string();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("Endpoint URL must be http(s), got '{}'", url);
            }
            let user_id = id_for_user(conn, user)?;
            conn.execute(
                "INSERT INTO push_endpoints(user_id, label, url) VALUES (?1, ?2, ?3)",
                params![user_id, label, url],
            )?;
            println!("Registered push endpoint '{}' for {}", label, user);
        }
        Some(("list", sub)) => {
            let user = sub.get_one::<String>("user").unwrap();
            let user_id = id_for_user(conn, user)?;
            let mut stmt = conn
                .prepare("SELECT label, url FROM push_endpoints WHERE user_id=?1 ORDER BY label")?;
            let rows = stmt.query_map(params![user_id], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (l, u) = row?;
                data.push(vec![l, u]);
            }
            println!("{}", pretty_table(&["Label", "URL"], data));
        }
        Some(("rm", sub)) => {
            let user = sub.get_one::<String>("user").unwrap();
            let label = sub.get_one::<String>("label").unwrap().trim();
            let user_id = id_for_user(conn, user)?;
            let removed = conn.execute(
                "DELETE FROM push_endpoints WHERE user_id=?1 AND label=?2",
                params![user_id, label],
            )?;
            if removed == 0 {
                bail!("No push endpoint '{}' for {}", label, user);
            }
            println!("Removed push endpoint '{}'", label);
        }
        _ => {}
    }
    Ok(())
}
