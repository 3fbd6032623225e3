// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::rules::category_for;
use crate::config::resolve_day;
use crate::engine::{ReportingDay, sum_amounts};
use crate::models::{NewTransaction, Transaction, TxKind};
use crate::utils::{fmt_amount, maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TxKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let description = sub.get_one::<String>("desc").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let date = resolve_day(conn, sub.get_one::<String>("date"))?.date();
    let mut category = sub
        .get_one::<String>("category")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    if category.is_none() {
        category = category_for(conn, &description)?;
    }

    let draft = NewTransaction {
        kind,
        description,
        amount,
        date,
        category,
    };
    let id = add_transaction(conn, &draft)?;
    println!(
        "Recorded {} #{}: {} '{}' on {}{}",
        draft.kind,
        id,
        fmt_amount(&draft.amount),
        draft.description,
        draft.date,
        draft
            .category
            .as_ref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default()
    );
    Ok(())
}

pub fn add_transaction(conn: &Connection, draft: &NewTransaction) -> Result<i64> {
    draft.validate()?;
    conn.execute(
        "INSERT INTO transactions(kind, description, amount, date, category)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            draft.kind.as_str(),
            draft.description.trim(),
            draft.amount.to_string(),
            draft.date.to_string(),
            draft.category
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(id, kind = %draft.kind, amount = %draft.amount, "transaction recorded");
    Ok(id)
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n > 0 {
        info!(id, "transaction deleted");
    }
    Ok(n > 0)
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub.get_one::<String>("id").unwrap();
    let id = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid transaction id '{}'", raw))?;
    if delete_transaction(conn, id)? {
        println!("Removed transaction {}", id);
    } else {
        anyhow::bail!("Transaction {} not found", id);
    }
    Ok(())
}

type RawRow = (i64, String, String, String, String, Option<String>);

const SELECT_COLUMNS: &str = "SELECT id, kind, description, amount, date, category FROM transactions";

fn read_raw(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
    ))
}

fn parse_raw(raw: RawRow) -> Result<Transaction> {
    let (id, kind, description, amount, date, category) = raw;
    let kind = kind
        .parse::<TxKind>()
        .with_context(|| format!("Transaction {} has an invalid kind", id))?;
    let amount = amount
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' in transaction {}", amount, id))?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' in transaction {}", date, id))?;
    Ok(Transaction {
        id,
        kind,
        description,
        amount,
        date,
        category,
    })
}

/// Parsed rows; unreadable ones are logged and left for `doctor` to report.
fn collect_rows(rows: impl Iterator<Item = rusqlite::Result<RawRow>>) -> Result<Vec<Transaction>> {
    let mut out = Vec::new();
    for row in rows {
        match parse_raw(row?) {
            Ok(t) => out.push(t),
            Err(err) => warn!("skipping transaction: {:#}", err),
        }
    }
    Ok(out)
}

/// The full ledger, oldest first.
pub fn load_ledger(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY date, id", SELECT_COLUMNS))?;
    let rows = stmt.query_map([], read_raw)?;
    collect_rows(rows)
}

/// Filtered ledger rows, newest first.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let mut sql = format!("{} WHERE 1=1", SELECT_COLUMNS);
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(parse_month(month.trim())?);
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        sql.push_str(" AND kind=?");
        params_vec.push(kind.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND category=?");
        params_vec.push(cat.trim().into());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), read_raw)?;
    collect_rows(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.description.clone(),
                    fmt_amount(&t.amount),
                    t.category.clone().unwrap_or_default(),
                ]
            })
            .collect();
        if rows.is_empty() {
            println!("No entries yet.");
        } else {
            println!(
                "{}",
                pretty_table(
                    &["ID", "Date", "Kind", "Description", "Amount", "Category"],
                    rows,
                )
            );
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub today_spent: Decimal,
    pub month_income: Decimal,
    pub month_expense: Decimal,
    pub net: Decimal,
}

pub fn daily_summary(ledger: &[Transaction], day: ReportingDay) -> DailySummary {
    let in_month = |kind: TxKind| {
        sum_amounts(
            ledger
                .iter()
                .filter(move |t| t.kind == kind && day.in_same_month(t.date)),
        )
    };
    let month_income = in_month(TxKind::Income);
    let month_expense = in_month(TxKind::Expense);
    DailySummary {
        date: day.date(),
        today_spent: sum_amounts(
            ledger
                .iter()
                .filter(|t| t.is_expense() && t.date == day.date()),
        ),
        month_income,
        month_expense,
        net: month_income.saturating_sub(month_expense),
    }
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let day = resolve_day(conn, sub.get_one::<String>("date"))?;
    let s = daily_summary(&load_ledger(conn)?, day);
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        println!(
            "Today Spent: {} | Month: Income {}, Spent {} | Net: {}",
            fmt_amount(&s.today_spent),
            fmt_amount(&s.month_income),
            fmt_amount(&s.month_expense),
            fmt_amount(&s.net)
        );
    }
    Ok(())
}
