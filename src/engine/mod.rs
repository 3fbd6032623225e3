// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-based financial decision engine.
//!
//! Every function here is pure: it takes the ledger, the optional monthly
//! budget and a captured [`ReportingDay`], and returns plain data. Storage,
//! clocks and presentation live with the callers.

mod behavior;
mod clock;
mod risk;
mod state;

pub use behavior::{BehaviorReport, run_behavior_model};
pub use clock::{ReportingDay, days_in_month};
pub use risk::{RiskAssessment, run_risk_engine};
pub use state::{FinancialState, SafetyLevel, calculate_state};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::Transaction;

/// All three engine results for one reporting day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialReport {
    pub as_of: ReportingDay,
    /// The budget the models actually used; `None` when absent or not positive.
    pub budget: Option<Decimal>,
    pub state: FinancialState,
    pub risk: RiskAssessment,
    pub behavior: BehaviorReport,
}

pub fn evaluate(
    transactions: &[Transaction],
    monthly_budget: Option<Decimal>,
    day: ReportingDay,
    config: &EngineConfig,
) -> FinancialReport {
    let state = calculate_state(transactions, monthly_budget, day, config);
    let risk = run_risk_engine(&state, monthly_budget, day, config);
    let behavior = run_behavior_model(transactions, day, config);
    debug!(
        as_of = %day.date(),
        ledger = transactions.len(),
        safety = %state.safety_level,
        risk_score = risk.risk_score,
        spikes = behavior.category_spikes.len(),
        "financial evaluation complete"
    );
    FinancialReport {
        as_of: day,
        budget: active_budget(monthly_budget),
        state,
        risk,
        behavior,
    }
}

/// A budget only takes part in the math when it is strictly positive.
pub(crate) fn active_budget(budget: Option<Decimal>) -> Option<Decimal> {
    budget.filter(|b| *b > Decimal::ZERO)
}

pub(crate) fn sum_amounts<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    txs.into_iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::TxKind;
    use chrono::NaiveDate;

    pub(crate) fn day(y: i32, m: u32, d: u32) -> ReportingDay {
        ReportingDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    pub(crate) fn tx(
        id: i64,
        kind: TxKind,
        amount: &str,
        (y, m, d): (i32, u32, u32),
        category: Option<&str>,
    ) -> Transaction {
        Transaction {
            id,
            kind,
            description: format!("entry {}", id),
            amount: amount.parse().unwrap(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            category: category.map(str::to_string),
        }
    }

    fn sample_ledger() -> Vec<Transaction> {
        vec![
            tx(1, TxKind::Income, "52000", (2025, 6, 1), Some("Salary")),
            tx(2, TxKind::Expense, "18000", (2025, 6, 2), Some("Rent")),
            tx(3, TxKind::Expense, "450", (2025, 6, 7), Some("Food")),
            tx(4, TxKind::Expense, "320.75", (2025, 6, 8), Some("Food")),
            tx(5, TxKind::Expense, "2999", (2025, 6, 10), Some("Gadgets")),
            tx(6, TxKind::Expense, "120", (2025, 5, 30), Some("Food")),
        ]
    }

    #[test]
    fn evaluation_is_pure() {
        let ledger = sample_ledger();
        let budget = Some(Decimal::from(25_000));
        let cfg = EngineConfig::default();
        let first = evaluate(&ledger, budget, day(2025, 6, 10), &cfg);
        let second = evaluate(&ledger, budget, day(2025, 6, 10), &cfg);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(ledger, sample_ledger());
    }

    #[test]
    fn evaluation_wires_one_day_through_all_models() {
        let report = evaluate(
            &sample_ledger(),
            Some(Decimal::from(25_000)),
            day(2025, 6, 10),
            &EngineConfig::default(),
        );
        assert_eq!(report.as_of, day(2025, 6, 10));
        assert_eq!(
            report.state.month_expense_total,
            "21769.75".parse::<Decimal>().unwrap()
        );
        assert!(report.risk.risk_score <= 100);
        assert_eq!(report.behavior.recent_transaction_count, 3);
        assert!(report.behavior.abnormal_velocity_detected);
    }

    #[test]
    fn risk_is_bounded_across_budgets_and_days() {
        let ledger = sample_ledger();
        let cfg = EngineConfig::default();
        for budget in [0, 1, 500, 21_000, 1_000_000] {
            for d in 1..=30 {
                let today = day(2025, 6, d);
                let budget = Some(Decimal::from(budget));
                let state = calculate_state(&ledger, budget, today, &cfg);
                assert!(state.month_expense_total >= Decimal::ZERO);
                let risk = run_risk_engine(&state, budget, today, &cfg);
                for v in [risk.overspend_risk, risk.deficit_risk, risk.risk_score] {
                    assert!(v <= 100);
                }
            }
        }
    }

    #[test]
    fn serializes_for_presentation() {
        let report = evaluate(&[], None, day(2025, 1, 31), &EngineConfig::default());
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["as_of"], "2025-01-31");
        assert_eq!(v["budget"], serde_json::Value::Null);
        assert_eq!(v["state"]["safety_level"], "Stable");
        assert_eq!(v["behavior"]["category_spikes"], serde_json::json!([]));
    }
}
