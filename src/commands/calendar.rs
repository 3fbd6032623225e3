// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use crate::commands::habits::habit_log_for;
use crate::commands::transactions::load_ledger;
use crate::config::reporting_today;
use crate::models::{Transaction, TxKind};
use crate::utils::{fmt_amount, maybe_print_json, month_bounds, parse_date, parse_month, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, sub)?,
        Some(("day", sub)) => day(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub habits_done: usize,
    pub spent: Decimal,
    pub income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayDetails {
    pub date: NaiveDate,
    pub habits: Vec<String>,
    pub spent: Decimal,
    pub income: Decimal,
}

fn totals_on<'a>(ledger: impl Iterator<Item = &'a Transaction>) -> (Decimal, Decimal) {
    ledger.fold((Decimal::ZERO, Decimal::ZERO), |(spent, income), t| match t.kind {
        TxKind::Expense => (spent.saturating_add(t.amount), income),
        TxKind::Income => (spent, income.saturating_add(t.amount)),
    })
}

/// One cell per calendar day of `month` (`YYYY-MM`).
pub fn month_view(conn: &Connection, month: &str) -> Result<Vec<DayCell>> {
    let (first, last) = month_bounds(month)?;

    let mut habit_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut stmt = conn.prepare(
        "SELECT date, COUNT(*) FROM habit_logs WHERE date>=?1 AND date<=?2 GROUP BY date",
    )?;
    let rows = stmt.query_map(params![first.to_string(), last.to_string()], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (date, count) = row?;
        habit_counts.insert(date, usize::try_from(count).unwrap_or_default());
    }

    let ledger = load_ledger(conn)?;
    let cells = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| {
            let (spent, income) = totals_on(ledger.iter().filter(|t| t.date == date));
            DayCell {
                date,
                habits_done: habit_counts.get(&date.to_string()).copied().unwrap_or(0),
                spent,
                income,
            }
        })
        .collect();
    Ok(cells)
}

pub fn day_details(conn: &Connection, date: NaiveDate) -> Result<DayDetails> {
    let ledger = load_ledger(conn)?;
    let (spent, income) = totals_on(ledger.iter().filter(|t| t.date == date));
    Ok(DayDetails {
        date,
        habits: habit_log_for(conn, date)?.habits,
        spent,
        income,
    })
}

fn month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m.trim())?,
        None => reporting_today(conn)?.month_key(),
    };
    let cells = month_view(conn, &month)?;
    if maybe_print_json(json_flag, jsonl_flag, &cells)? {
        return Ok(());
    }
    let blank_or = |show: bool, s: String| if show { s } else { String::new() };
    let rows = cells
        .iter()
        .map(|c| {
            vec![
                c.date.format("%a %d").to_string(),
                blank_or(c.habits_done > 0, format!("✓ {}", c.habits_done)),
                blank_or(!c.spent.is_zero(), format!("-{}", fmt_amount(&c.spent))),
                blank_or(!c.income.is_zero(), format!("+{}", fmt_amount(&c.income))),
            ]
        })
        .collect();
    println!("{}", month);
    println!(
        "{}",
        pretty_table(&["Day", "Habits", "Spent", "Income"], rows)
    );
    Ok(())
}

fn day(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let date = parse_date(sub.get_one::<String>("date").unwrap().trim())?;
    let d = day_details(conn, date)?;
    if maybe_print_json(json_flag, jsonl_flag, &d)? {
        return Ok(());
    }
    let habits = if d.habits.is_empty() {
        "None".to_string()
    } else {
        d.habits.join(", ")
    };
    let title = d.date.format("%a %b %d %Y").to_string();
    println!(
        "{}",
        pretty_table(
            &[title.as_str(), ""],
            vec![
                vec!["Habits Done".into(), d.habits.len().to_string()],
                vec!["Habits".into(), habits],
                vec!["Spent".into(), fmt_amount(&d.spent)],
                vec!["Income".into(), fmt_amount(&d.income)],
            ],
        )
    );
    Ok(())
}
