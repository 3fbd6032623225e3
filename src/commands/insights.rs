// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::budgets::get_monthly_budget;
use crate::commands::transactions::load_ledger;
use crate::config::{EngineConfig, resolve_day};
use crate::engine::{self, FinancialReport, ReportingDay};
use crate::utils::{fmt_amount, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    // Captured once; every model below sees the same day.
    let day = resolve_day(conn, m.get_one::<String>("date"))?;
    let report = build_report(conn, day)?;
    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        print_report(&report);
    }
    Ok(())
}

pub fn build_report(conn: &Connection, day: ReportingDay) -> Result<FinancialReport> {
    let ledger = load_ledger(conn)?;
    let budget = get_monthly_budget(conn)?;
    let config = EngineConfig::load(conn)?;
    Ok(engine::evaluate(&ledger, budget, day, &config))
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

fn print_report(r: &FinancialReport) {
    let s = &r.state;
    println!(
        "As of {} (day {} of {})",
        r.as_of.date(),
        s.day_of_month,
        s.days_in_month
    );
    if r.budget.is_none() {
        println!("No monthly budget set; risk scores are zero and safety defaults to Stable.");
    }
    println!(
        "{}",
        pretty_table(
            &["Financial State", ""],
            vec![
                vec!["Spent this month".into(), fmt_amount(&s.month_expense_total)],
                vec!["Income this month".into(), fmt_amount(&s.month_income_total)],
                vec!["Balance remaining".into(), fmt_amount(&s.balance_remaining)],
                vec!["Daily burn rate".into(), fmt_amount(&s.daily_burn_rate)],
                vec![
                    "Projected month-end balance".into(),
                    fmt_amount(&s.projected_end_of_month_balance),
                ],
                vec!["Safety level".into(), s.safety_level.to_string()],
            ],
        )
    );
    println!(
        "{}",
        pretty_table(
            &["Risk", "0-100"],
            vec![
                vec!["Overspend risk".into(), r.risk.overspend_risk.to_string()],
                vec!["Deficit risk".into(), r.risk.deficit_risk.to_string()],
                vec!["Risk score".into(), r.risk.risk_score.to_string()],
            ],
        )
    );
    let b = &r.behavior;
    let spikes = if b.category_spikes.is_empty() {
        "none".to_string()
    } else {
        b.category_spikes.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    println!(
        "{}",
        pretty_table(
            &["Behavior (trailing window)", ""],
            vec![
                vec!["Recent expenses".into(), b.recent_transaction_count.to_string()],
                vec!["Category spikes".into(), spikes],
                vec!["Impulse pattern".into(), yes_no(b.impulse_pattern_detected)],
                vec!["Abnormal velocity".into(), yes_no(b.abnormal_velocity_detected)],
            ],
        )
    );
}
