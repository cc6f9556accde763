// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::notify::NotificationSink;
use crate::engine::threshold;
use crate::utils::{
    apply_rules, id_for_category, id_for_user, maybe_print_json, parse_date, parse_decimal,
    pretty_table,
};
use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let date = parse_date(sub.get_one::<String>("date").unwrap().trim())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let mut payee = sub.get_one::<String>("payee").unwrap().trim().to_string();
    let category = sub.get_one::<String>("category").map(|s| s.to_string());
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    let user_id = id_for_user(conn, user)?;
    let mut category_id = if let Some(cat) = category {
        Some(id_for_category(conn, &cat)?)
    } else {
        None
    };

    if category_id.is_none() {
        let (rule_cat, rewrite) = apply_rules(conn, &payee, note.as_deref())?;
        category_id = rule_cat;
        if let Some(newp) = rewrite {
            println!("Payee rewritten: {} -> {}", payee, newp);
            payee = newp;
        }
    }

    conn.execute(
        "INSERT INTO transactions(user_id, date, amount, payee, category_id, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![user_id, date, amount.to_string(), payee, category_id, note],
    )?;
    println!("Recorded {} on {} at '{}'", amount, date, payee);

    // Expenses against a budgeted category may tip it over its limit; this is
    // the only spend-tied alert path, and it fires on the transition only.
    if amount.is_sign_negative() {
        if let Some(cat_id) = category_id {
            let sink = NotificationSink::from_settings(conn)?;
            let crossed = threshold::overrun_alerts_on_expense(
                conn, &sink, user_id, cat_id, date, -amount,
            )?;
            if crossed > 0 {
                println!("Budget alert sent ({} budget(s) exceeded)", crossed);
            }
        }
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.payee.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Payee", "Amount", "Category", "Note"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub payee: String,
    pub amount: String,
    pub category: String,
    pub note: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, user)?;

    let mut sql = String::from(
        "SELECT t.date, t.payee, t.amount, c.name, t.note FROM transactions t \
         LEFT JOIN categories c ON t.category_id=c.id WHERE t.user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=?");
        params_vec.push(cat.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let payee: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let category: Option<String> = r.get(3)?;
        let note: Option<String> = r.get(4)?;
        data.push(TransactionRow {
            date,
            payee,
            amount,
            category: category.unwrap_or_default(),
            note: note.unwrap_or_default(),
        });
    }
    Ok(data)
}
