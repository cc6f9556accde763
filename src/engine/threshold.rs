// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

use super::notify::{Notification, NotificationSink};
use super::{spend, EngineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    Over,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "on_track",
            BudgetStatus::NearLimit => "near_limit",
            BudgetStatus::Over => "over",
        }
    }
}

/// Realized spend as a percentage of the budget limit. Zero when the limit is
/// non-positive, so a malformed budget never divides by zero.
pub fn percentage(amount: Decimal, spent: Decimal) -> Decimal {
    if amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    spent / amount * Decimal::from(100)
}

/// Classify a budget against its realized spend. Exactly one state, evaluated
/// over > 100, then threshold <= pct <= 100, then on-track.
pub fn classify(amount: Decimal, alert_threshold: u8, spent: Decimal) -> BudgetStatus {
    let pct = percentage(amount, spent);
    if pct > Decimal::from(100) {
        BudgetStatus::Over
    } else if pct >= Decimal::from(alert_threshold) {
        BudgetStatus::NearLimit
    } else {
        BudgetStatus::OnTrack
    }
}

/// Fire "budget exceeded" notifications for an expense that was just recorded.
///
/// Compares classification before and after the new expense so a budget that
/// is already over does not re-alert on every subsequent write. Returns the
/// number of budgets that crossed into `Over`.
pub fn overrun_alerts_on_expense(
    conn: &Connection,
    sink: &NotificationSink,
    user_id: i64,
    category_id: i64,
    date: NaiveDate,
    magnitude: Decimal,
) -> Result<u32, EngineError> {
    let category: String = conn.query_row(
        "SELECT name FROM categories WHERE id=?1",
        params![category_id],
        |r| r.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT id, amount, alert_threshold, start_date, end_date FROM budgets
         WHERE user_id=?1 AND category=?2 AND active=1 AND start_date<=?3 AND end_date>?3",
    )?;
    let rows = stmt.query_map(params![user_id, category, date], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, NaiveDate>(3)?,
            r.get::<_, NaiveDate>(4)?,
        ))
    })?;

    let mut crossed = 0u32;
    for row in rows {
        let (budget_id, amount_s, threshold, start, end) = row?;
        let amount: Decimal = amount_s.parse().map_err(|_| {
            EngineError::Corrupt(format!("invalid amount '{}' on budget {}", amount_s, budget_id))
        })?;
        let after = spend::sum_spent(conn, user_id, category_id, start, end)?;
        let before = after - magnitude;
        let threshold = threshold.clamp(1, 100) as u8;
        if classify(amount, threshold, after) == BudgetStatus::Over
            && classify(amount, threshold, before) != BudgetStatus::Over
        {
            let pct = percentage(amount, after).round_dp(0);
            sink.notify(
                conn,
                user_id,
                &Notification {
                    title: format!("Budget exceeded: {}", category),
                    body: format!(
                        "Spending for '{}' reached {}% of the {} limit",
                        category, pct, amount
                    ),
                    action_link: Some(format!("billkeep://budgets/{}", budget_id)),
                },
            );
            crossed += 1;
        }
    }
    Ok(crossed)
}
