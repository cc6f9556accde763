// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{self, recurrence, sweep};
use crate::models::{Bill, BillCategory, Frequency};
use crate::utils::{id_for_user, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{bail, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("upcoming", sub)) => upcoming(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let category_raw = sub.get_one::<String>("category").unwrap().trim();
    let due = parse_date(sub.get_one::<String>("due").unwrap().trim())?;
    let frequency_raw = sub.get_one::<String>("frequency").unwrap().trim();
    let reminder_days: i64 = sub.get_one::<String>("reminder-days").unwrap().trim().parse()?;
    let notes = sub.get_one::<String>("notes").map(|s| s.to_string());

    if name.is_empty() {
        bail!("Bill name must not be empty");
    }
    if amount < Decimal::ZERO {
        bail!("Bill amount must not be negative, got {}", amount);
    }
    let Some(category) = BillCategory::parse(category_raw) else {
        bail!(
            "Unknown bill category '{}', expected housing|utilities|insurance|subscription|loan|other",
            category_raw
        );
    };
    let Some(frequency) = Frequency::parse(frequency_raw) else {
        bail!(
            "Unknown frequency '{}', expected once|weekly|monthly|quarterly|yearly",
            frequency_raw
        );
    };
    if reminder_days < 0 {
        bail!("Reminder lead days must not be negative, got {}", reminder_days);
    }

    let user_id = id_for_user(conn, user)?;
    conn.execute(
        "INSERT INTO bills(user_id, name, amount, category, due_date, frequency, reminder_days, notes)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            user_id,
            name,
            amount.to_string(),
            category.as_str(),
            due,
            frequency.as_str(),
            reminder_days,
            notes
        ],
    )?;
    println!("Added bill '{}' ({}) due {}", name, amount, due);
    Ok(())
}

#[derive(Serialize)]
struct BillRowOut {
    id: i64,
    name: String,
    amount: String,
    category: &'static str,
    due_date: String,
    frequency: &'static str,
    reminder_days: i64,
    paid: bool,
    last_paid: String,
}

fn to_row(b: &Bill) -> BillRowOut {
    BillRowOut {
        id: b.id,
        name: b.name.clone(),
        amount: format!("{:.2}", b.amount),
        category: b.category.as_str(),
        due_date: b.due_date.to_string(),
        frequency: b.frequency.as_str(),
        reminder_days: b.reminder_days,
        paid: b.is_paid,
        last_paid: b.last_paid_date.map(|d| d.to_string()).unwrap_or_default(),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();
    let include_paid = sub.get_flag("all");
    let user_id = id_for_user(conn, user)?;

    let bills = engine::list_bills(conn, user_id, include_paid)?;
    let data: Vec<BillRowOut> = bills.iter().map(to_row).collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    r.amount.clone(),
                    r.category.to_string(),
                    r.due_date.clone(),
                    r.frequency.to_string(),
                    if r.paid { "yes" } else { "no" }.to_string(),
                    r.last_paid.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Amount", "Category", "Due", "Frequency", "Paid", "Last paid"],
                rows
            )
        );
    }
    Ok(())
}

fn upcoming(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();
    let today = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?,
        None => Utc::now().date_naive(),
    };
    let user_id = id_for_user(conn, user)?;

    let bills = engine::list_bills(conn, user_id, false)?;
    let mut data = Vec::new();
    for b in &bills {
        let state = sweep::classify_due(b.due_date, b.reminder_days, today);
        let days = (b.due_date - today).num_days();
        data.push((to_row(b), state.as_str().to_string(), days));
    }

    if json_flag || jsonl_flag {
        #[derive(Serialize)]
        struct Out {
            #[serde(flatten)]
            bill: BillRowOut,
            state: String,
            days_until_due: i64,
        }
        let out: Vec<Out> = data
            .into_iter()
            .map(|(bill, state, days)| Out {
                bill,
                state,
                days_until_due: days,
            })
            .collect();
        maybe_print_json(json_flag, jsonl_flag, &out)?;
    } else {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|(r, state, days)| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    r.amount.clone(),
                    r.due_date.clone(),
                    days.to_string(),
                    state.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Amount", "Due", "Days", "State"], rows)
        );
    }
    Ok(())
}

fn pay(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let today = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw.trim())?,
        None => Utc::now().date_naive(),
    };
    let user_id = id_for_user(conn, user)?;

    let (paid, successor) = recurrence::mark_paid(conn, id, user_id, today)?;
    println!("Marked '{}' paid on {}", paid.name, today);
    match successor {
        Some(next) => println!(
            "Next occurrence: '{}' due {} (id {})",
            next.name, next.due_date, next.id
        ),
        None => println!("No further occurrences"),
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let user_id = id_for_user(conn, user)?;
    // Load first so ownership masking applies before any mutation
    let bill = engine::get_bill(conn, id, user_id)?;

    let name = match sub.get_one::<String>("name") {
        Some(raw) => {
            let v = raw.trim().to_string();
            if v.is_empty() {
                bail!("Bill name must not be empty");
            }
            v
        }
        None => bill.name,
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(raw) => {
            let v = parse_decimal(raw.trim())?;
            if v < Decimal::ZERO {
                bail!("Bill amount must not be negative, got {}", v);
            }
            v
        }
        None => bill.amount,
    };
    let category = match sub.get_one::<String>("category") {
        Some(raw) => BillCategory::parse(raw.trim())
            .ok_or_else(|| anyhow::anyhow!("Unknown bill category '{}'", raw.trim()))?,
        None => bill.category,
    };
    let due = match sub.get_one::<String>("due") {
        Some(raw) => parse_date(raw.trim())?,
        None => bill.due_date,
    };
    let frequency = match sub.get_one::<String>("frequency") {
        Some(raw) => Frequency::parse(raw.trim())
            .ok_or_else(|| anyhow::anyhow!("Unknown frequency '{}'", raw.trim()))?,
        None => bill.frequency,
    };
    let reminder_days = match sub.get_one::<String>("reminder-days") {
        Some(raw) => {
            let v: i64 = raw.trim().parse()?;
            if v < 0 {
                bail!("Reminder lead days must not be negative, got {}", v);
            }
            v
        }
        None => bill.reminder_days,
    };
    let notes = match sub.get_one::<String>("notes") {
        Some(raw) => Some(raw.to_string()),
        None => bill.notes,
    };

    conn.execute(
        "UPDATE bills SET name=?1, amount=?2, category=?3, due_date=?4, frequency=?5,
                          reminder_days=?6, notes=?7
         WHERE id=?8 AND user_id=?9",
        params![
            name,
            amount.to_string(),
            category.as_str(),
            due,
            frequency.as_str(),
            reminder_days,
            notes,
            id,
            user_id
        ],
    )?;
    println!("Updated bill {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let user_id = id_for_user(conn, user)?;
    let removed = conn.execute(
        "DELETE FROM bills WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    if removed == 0 {
        bail!("Bill {} not found", id);
    }
    println!("Removed bill {}", id);
    Ok(())
}
