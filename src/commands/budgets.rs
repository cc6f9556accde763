// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{spend, threshold};
use crate::utils::{id_for_user, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Budget, BudgetPeriod};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let category = sub
        .get_one::<String>("category")
        .unwrap()
        .trim()
        .to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let period_raw = sub.get_one::<String>("period").unwrap().trim();
    let from = parse_date(sub.get_one::<String>("from").unwrap().trim())?;
    let to = parse_date(sub.get_one::<String>("to").unwrap().trim())?;
    let threshold: i64 = match sub.get_one::<String>("threshold") {
        Some(raw) => raw.trim().parse()?,
        None => 80,
    };

    if amount <= Decimal::ZERO {
        bail!("Budget amount must be positive, got {}", amount);
    }
    let Some(period) = BudgetPeriod::parse(period_raw) else {
        bail!(
            "Unknown period '{}', expected weekly|monthly|quarterly|yearly",
            period_raw
        );
    };
    if !(1..=100).contains(&threshold) {
        bail!("Alert threshold must be in 1..=100, got {}", threshold);
    }
    if from >= to {
        bail!("Budget window start {} must be before end {}", from, to);
    }

    let user_id = id_for_user(conn, user)?;
    conn.execute(
        "INSERT INTO budgets(user_id, category, amount, period, alert_threshold, start_date, end_date)
         VALUES (?1,?2,?3,?4,?5,?6,?7)
         ON CONFLICT(user_id, category, start_date) DO UPDATE SET
             amount=excluded.amount, period=excluded.period,
             alert_threshold=excluded.alert_threshold, end_date=excluded.end_date",
        params![
            user_id,
            category,
            amount.to_string(),
            period.as_str(),
            threshold,
            from,
            to
        ],
    )?;
    println!("Budget set for {} / {} = {}", user, category, amount);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, user)?;

    let mut stmt = conn.prepare(
        "SELECT id, user_id, category, amount, period, alert_threshold, start_date, end_date, active
         FROM budgets WHERE user_id=?1 ORDER BY start_date DESC, category",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, i64>(5)?,
            r.get::<_, NaiveDate>(6)?,
            r.get::<_, NaiveDate>(7)?,
            r.get::<_, bool>(8)?,
        ))
    })?;
    let mut budgets = Vec::new();
    for row in rows {
        let (id, user_id, category, amount_s, period_s, threshold, start, end, active) = row?;
        let amount = parse_decimal(&amount_s)?;
        let period = BudgetPeriod::parse(&period_s)
            .ok_or_else(|| anyhow::anyhow!("Unknown period '{}' on budget {}", period_s, id))?;
        budgets.push(Budget {
            id,
            user_id,
            category,
            amount,
            period,
            alert_threshold: threshold.clamp(1, 100) as u8,
            start_date: start,
            end_date: end,
            active,
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &budgets)? {
        let rows: Vec<Vec<String>> = budgets
            .iter()
            .map(|b| {
                vec![
                    b.id.to_string(),
                    b.category.clone(),
                    format!("{:.2}", b.amount),
                    b.period.as_str().to_string(),
                    b.alert_threshold.to_string(),
                    b.start_date.to_string(),
                    b.end_date.to_string(),
                    if b.active { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Category", "Limit", "Period", "Alert %", "From", "To", "Active"],
                rows
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct BudgetStatusRow {
    id: i64,
    category: String,
    limit: String,
    spent: String,
    remaining: String,
    percentage: String,
    state: &'static str,
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, user)?;

    let mut stmt = conn.prepare(
        "SELECT id, category, amount, alert_threshold, start_date, end_date
         FROM budgets WHERE user_id=?1 AND active=1 ORDER BY start_date DESC, category",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, NaiveDate>(4)?,
            r.get::<_, NaiveDate>(5)?,
        ))
    })?;

    let mut data = Vec::new();
    for row in rows {
        let (id, category, amount_s, alert_threshold, start, end) = row?;
        let amount = parse_decimal(&amount_s)?;
        // Spend is recomputed on every read, never persisted
        let cat_id: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE name=?1",
                params![category],
                |r| r.get(0),
            )
            .optional()?;
        let spent = match cat_id {
            Some(cid) => spend::sum_spent(conn, user_id, cid, start, end)?,
            None => Decimal::ZERO,
        };
        let state = threshold::classify(amount, alert_threshold.clamp(1, 100) as u8, spent);
        data.push(BudgetStatusRow {
            id,
            category,
            limit: format!("{:.2}", amount),
            spent: format!("{:.2}", spent),
            remaining: format!("{:.2}", amount - spent),
            percentage: format!("{:.1}", threshold::percentage(amount, spent)),
            state: state.as_str(),
        });
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.category.clone(),
                    r.limit.clone(),
                    r.spent.clone(),
                    r.remaining.clone(),
                    r.percentage.clone(),
                    r.state.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Category", "Limit", "Spent", "Remaining", "%", "State"],
                rows
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let id: i64 = sub.get_one::<String>("id").unwrap().trim().parse()?;
    let user_id = id_for_user(conn, user)?;
    let removed = conn.execute(
        "DELETE FROM budgets WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    if removed == 0 {
        bail!("Budget {} not found", id);
    }
    println!("Removed budget {}", id);
    Ok(())
}
