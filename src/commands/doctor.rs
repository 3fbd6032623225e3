// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::budgets::BUDGET_KEY;
use crate::config::reporting_today;
use crate::models::TxKind;
use crate::utils::{get_setting, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let today = reporting_today(conn)?.date();
    let rows = diagnose(conn, today)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// `[issue, detail]` rows for ledger entries the engine would misread.
pub fn diagnose(conn: &Connection, today: NaiveDate) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Transactions with unreadable or out-of-range values
    let mut stmt = conn.prepare("SELECT id, kind, date, amount FROM transactions ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let kind: String = r.get(1)?;
        let d: String = r.get(2)?;
        let a: String = r.get(3)?;
        if kind.parse::<TxKind>().is_err() {
            rows.push(vec!["unknown_kind".into(), format!("#{} '{}'", id, kind)]);
        }
        match NaiveDate::parse_from_str(&d, "%Y-%m-%d") {
            Ok(date) if date > today => {
                rows.push(vec!["future_dated".into(), format!("#{} {}", id, d)])
            }
            Ok(_) => {}
            Err(_) => rows.push(vec!["bad_date".into(), format!("#{} '{}'", id, d)]),
        }
        match a.parse::<Decimal>() {
            Ok(v) if v <= Decimal::ZERO => {
                rows.push(vec!["non_positive_amount".into(), format!("#{} {}", id, a)])
            }
            Ok(_) => {}
            Err(_) => rows.push(vec!["bad_amount".into(), format!("#{} '{}'", id, a)]),
        }
    }

    // 2) Habit log rows whose habit has been removed
    let mut stmt2 = conn.prepare(
        "SELECT l.date, l.habit FROM habit_logs l
         LEFT JOIN habits h ON h.name = l.habit COLLATE NOCASE
         WHERE h.id IS NULL ORDER BY l.date",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let d: String = r.get(0)?;
        let habit: String = r.get(1)?;
        rows.push(vec!["orphan_habit_log".into(), format!("{} {}", d, habit)]);
    }

    // 3) Stored budget must be a positive decimal
    if let Some(b) = get_setting(conn, BUDGET_KEY)? {
        match b.parse::<Decimal>() {
            Ok(v) if v > Decimal::ZERO => {}
            _ => rows.push(vec!["bad_budget".into(), b]),
        }
    }

    Ok(rows)
}
