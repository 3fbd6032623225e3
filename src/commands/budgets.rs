// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::load_ledger;
use crate::config::resolve_day;
use crate::engine::{ReportingDay, sum_amounts};
use crate::error::LedgerError;
use crate::utils::{delete_setting, fmt_amount, get_setting, maybe_print_json, parse_decimal, set_setting};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

pub const BUDGET_KEY: &str = "monthly_budget";

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
            set_budget(conn, amount)?;
            println!("Monthly budget set to {}", fmt_amount(&amount));
        }
        Some(("clear", _)) => {
            if clear_budget(conn)? {
                println!("Monthly budget cleared");
            } else {
                println!("No monthly budget was set");
            }
        }
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn get_monthly_budget(conn: &Connection) -> Result<Option<Decimal>> {
    match get_setting(conn, BUDGET_KEY)? {
        Some(s) => {
            let b = s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid stored budget '{}'", s))?;
            Ok(Some(b))
        }
        None => Ok(None),
    }
}

pub fn set_budget(conn: &Connection, amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount).into());
    }
    set_setting(conn, BUDGET_KEY, &amount.to_string())?;
    info!(%amount, "monthly budget updated");
    Ok(())
}

pub fn clear_budget(conn: &Connection) -> Result<bool> {
    delete_setting(conn, BUDGET_KEY)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub month: String,
    pub budget: Option<Decimal>,
    pub spent: Decimal,
    pub remaining: Option<Decimal>,
    pub exceeded: bool,
}

pub fn budget_status(conn: &Connection, day: ReportingDay) -> Result<BudgetStatus> {
    let budget = get_monthly_budget(conn)?.filter(|b| *b > Decimal::ZERO);
    let ledger = load_ledger(conn)?;
    let spent = sum_amounts(
        ledger
            .iter()
            .filter(|t| t.is_expense() && day.in_same_month(t.date)),
    );
    let remaining = budget.map(|b| b.saturating_sub(spent));
    Ok(BudgetStatus {
        month: day.month_key(),
        budget,
        spent,
        remaining,
        exceeded: remaining.is_some_and(|r| r < Decimal::ZERO),
    })
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let day = resolve_day(conn, sub.get_one::<String>("date"))?;
    let s = budget_status(conn, day)?;
    if maybe_print_json(json_flag, jsonl_flag, &s)? {
        return Ok(());
    }
    match (s.budget, s.remaining) {
        (Some(b), Some(left)) if s.exceeded => println!(
            "Budget exceeded! Limit {} | Spent {} | Over by {}",
            fmt_amount(&b),
            fmt_amount(&s.spent),
            fmt_amount(&left.abs())
        ),
        (Some(b), Some(left)) => println!(
            "Budget: {} | Spent: {} | Remaining: {}",
            fmt_amount(&b),
            fmt_amount(&s.spent),
            fmt_amount(&left)
        ),
        _ => println!(
            "No monthly budget set | Spent in {}: {}",
            s.month,
            fmt_amount(&s.spent)
        ),
    }
    Ok(())
}
