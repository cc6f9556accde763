// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use super::EngineError;

/// Total realized spend for one user and category inside [from, to).
///
/// Expenses are stored as negative amounts; the sum returned is the positive
/// magnitude. An empty window sums to zero, never an error.
pub fn sum_spent(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Decimal, EngineError> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, amount FROM transactions
         WHERE user_id=?1 AND category_id=?2 AND amount<0 AND date>=?3 AND date<?4",
    )?;
    let mut rows = stmt.query(params![user_id, category_id, from, to])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let amt_s: String = r.get(1)?;
        let amt: Decimal = amt_s.parse().map_err(|_| {
            EngineError::Corrupt(format!("invalid amount '{}' on transaction {}", amt_s, id))
        })?;
        total += -amt;
    }
    Ok(total)
}
