// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerpulse::commands::budgets::set_budget;
use ledgerpulse::commands::insights::build_report;
use ledgerpulse::commands::settings::set_config;
use ledgerpulse::commands::transactions::add_transaction;
use ledgerpulse::db;
use ledgerpulse::utils::set_setting;
use ledgerpulse::engine::{ReportingDay, SafetyLevel};
use ledgerpulse::models::{NewTransaction, TxKind};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn spend(conn: &Connection, desc: &str, amount: &str, on: (i32, u32, u32), category: &str) {
    add_transaction(
        conn,
        &NewTransaction {
            kind: TxKind::Expense,
            description: desc.into(),
            amount: amount.parse().unwrap(),
            date: NaiveDate::from_ymd_opt(on.0, on.1, on.2).unwrap(),
            category: Some(category.into()),
        },
    )
    .unwrap();
}

fn june(d: u32) -> ReportingDay {
    ReportingDay::new(NaiveDate::from_ymd_opt(2025, 6, d).unwrap())
}

#[test]
fn report_for_half_budget_spent_by_day_ten() {
    let conn = setup();
    set_budget(&conn, Decimal::from(10_000)).unwrap();
    spend(&conn, "Rent", "5000", (2025, 6, 1), "Housing");
    // Previous month is ignored by the state calculator.
    spend(&conn, "May rent", "5000", (2025, 5, 1), "Housing");

    let report = build_report(&conn, june(10)).unwrap();
    assert_eq!(report.as_of, june(10));
    assert_eq!(report.state.daily_burn_rate, Decimal::from(500));
    assert_eq!(report.state.balance_remaining, Decimal::from(5000));
    assert_eq!(
        report.state.projected_end_of_month_balance,
        Decimal::from(-5000)
    );
    assert_eq!(report.state.safety_level, SafetyLevel::Critical);
    assert_eq!(report.risk.overspend_risk, 17);
    assert_eq!(report.risk.deficit_risk, 50);
    assert_eq!(report.risk.risk_score, 30);
    // Rent on June 1 is outside the trailing week.
    assert_eq!(report.behavior.recent_transaction_count, 0);
    assert!(report.behavior.category_spikes.is_empty());
}

#[test]
fn stored_engine_settings_change_the_report() {
    let conn = setup();
    set_budget(&conn, Decimal::from(10_000)).unwrap();
    spend(&conn, "Rent", "5000", (2025, 6, 1), "Housing");
    set_config(&conn, "engine.overspend_weight", "0").unwrap();
    set_config(&conn, "engine.deficit_weight", "1").unwrap();
    set_config(&conn, "engine.window_days", "10").unwrap();
    set_config(&conn, "engine.spike_threshold", "4000").unwrap();

    let report = build_report(&conn, june(10)).unwrap();
    assert_eq!(report.risk.risk_score, 50);
    assert_eq!(report.behavior.recent_transaction_count, 1);
    assert!(report.behavior.category_spikes.contains("Housing"));
}

#[test]
fn without_budget_risk_is_zero_and_state_is_stable() {
    let conn = setup();
    for day in 5..=10 {
        spend(&conn, "Snacks", "500", (2025, 6, day), "Food");
    }
    let report = build_report(&conn, june(10)).unwrap();
    assert_eq!(report.state.safety_level, SafetyLevel::Stable);
    assert_eq!(report.risk.overspend_risk, 0);
    assert_eq!(report.risk.deficit_risk, 0);
    assert_eq!(report.risk.risk_score, 0);
    assert_eq!(report.behavior.recent_transaction_count, 6);
    assert!(report.behavior.impulse_pattern_detected);
}

#[test]
fn stored_zero_budget_counts_as_no_budget() {
    let conn = setup();
    set_setting(&conn, "monthly_budget", "0").unwrap();
    spend(&conn, "Rent", "5000", (2025, 6, 1), "Housing");

    let report = build_report(&conn, june(10)).unwrap();
    assert_eq!(report.budget, None);
    assert_eq!(report.state.safety_level, SafetyLevel::Stable);
    assert_eq!(report.risk.risk_score, 0);

    set_budget(&conn, Decimal::from(10_000)).unwrap();
    assert_eq!(
        build_report(&conn, june(10)).unwrap().budget,
        Some(Decimal::from(10_000))
    );
}
