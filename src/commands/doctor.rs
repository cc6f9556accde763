// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Paid recurring bills that never spawned a successor
    let mut stmt = conn.prepare(
        "SELECT p.id, p.name FROM bills p
         WHERE p.is_paid=1 AND p.frequency != 'once'
           AND NOT EXISTS (
               SELECT 1 FROM bills s
               WHERE s.user_id=p.user_id AND s.name=p.name
                 AND s.frequency=p.frequency AND s.due_date>p.due_date
           )",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        rows.push(vec!["paid_not_advanced".into(), format!("{} '{}'", id, name)]);
    }

    // 2) Duplicate unpaid occurrences of the same recurring series on one due date
    let mut stmt2 = conn.prepare(
        "SELECT user_id, name, due_date, COUNT(*) FROM bills
         WHERE is_paid=0 AND frequency != 'once'
         GROUP BY user_id, name, due_date HAVING COUNT(*) > 1",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let name: String = r.get(1)?;
        let due: String = r.get(2)?;
        let n: i64 = r.get(3)?;
        rows.push(vec![
            "duplicate_unpaid_occurrence".into(),
            format!("'{}' due {} x{}", name, due, n),
        ]);
    }

    // 3) Bills with negative amounts
    let mut stmt3 = conn.prepare("SELECT id, amount FROM bills WHERE CAST(amount AS REAL) < 0")?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let amt: String = r.get(1)?;
        rows.push(vec!["negative_bill_amount".into(), format!("{} ({})", id, amt)]);
    }

    // 4) Budgets with inverted or empty windows
    let mut stmt4 =
        conn.prepare("SELECT id, start_date, end_date FROM budgets WHERE start_date >= end_date")?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        let s: String = r.get(1)?;
        let e: String = r.get(2)?;
        rows.push(vec!["inverted_budget_window".into(), format!("{} [{}, {})", id, s, e)]);
    }

    // 5) Transactions pointing at a missing category
    let mut stmt5 = conn.prepare(
        "SELECT t.id FROM transactions t
         WHERE t.category_id IS NOT NULL
           AND NOT EXISTS (SELECT 1 FROM categories c WHERE c.id=t.category_id)",
    )?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["txn_unknown_category".into(), id.to_string()]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
