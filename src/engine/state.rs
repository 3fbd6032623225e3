// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{ReportingDay, active_budget, sum_amounts};
use crate::config::EngineConfig;
use crate::models::{Transaction, TxKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SafetyLevel {
    Stable,
    Warning,
    Critical,
}

impl std::fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SafetyLevel::Stable => "Stable",
            SafetyLevel::Warning => "Warning",
            SafetyLevel::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// Current-month position of the ledger against the budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialState {
    pub balance_remaining: Decimal,
    pub daily_burn_rate: Decimal,
    pub projected_end_of_month_balance: Decimal,
    pub safety_level: SafetyLevel,
    pub month_expense_total: Decimal,
    pub month_income_total: Decimal,
    pub day_of_month: u32,
    pub days_in_month: u32,
}

pub fn calculate_state(
    transactions: &[Transaction],
    monthly_budget: Option<Decimal>,
    day: ReportingDay,
    config: &EngineConfig,
) -> FinancialState {
    let month_total = |kind: TxKind| {
        sum_amounts(
            transactions
                .iter()
                .filter(|t| t.kind == kind && day.in_same_month(t.date)),
        )
    };
    let month_expense_total = month_total(TxKind::Expense);
    let month_income_total = month_total(TxKind::Income);

    let budget = active_budget(monthly_budget);
    let budget_value = budget.unwrap_or(Decimal::ZERO);

    let day_of_month = day.day_of_month();
    let days_in_month = day.days_in_month();
    let daily_burn_rate = if day_of_month == 0 {
        Decimal::ZERO
    } else {
        month_expense_total
            .checked_div(Decimal::from(day_of_month))
            .unwrap_or(Decimal::ZERO)
    };
    let projected_spend = daily_burn_rate
        .checked_mul(Decimal::from(days_in_month))
        .unwrap_or(Decimal::MAX);
    let projected_end_of_month_balance = budget_value.saturating_sub(projected_spend);

    let safety_level = match budget {
        None => SafetyLevel::Stable,
        Some(b) => classify(projected_end_of_month_balance, b, config.warning_margin),
    };

    FinancialState {
        balance_remaining: budget_value.saturating_sub(month_expense_total),
        daily_burn_rate,
        projected_end_of_month_balance,
        safety_level,
        month_expense_total,
        month_income_total,
        day_of_month,
        days_in_month,
    }
}

fn classify(projected: Decimal, budget: Decimal, margin: Decimal) -> SafetyLevel {
    if projected < Decimal::ZERO {
        SafetyLevel::Critical
    } else if projected < budget.saturating_mul(margin) {
        SafetyLevel::Warning
    } else {
        SafetyLevel::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::{day, tx};

    #[test]
    fn mid_month_overspend_is_critical() {
        // 10 days into a 30-day month with half the budget gone.
        let today = day(2025, 6, 10);
        let ledger = vec![
            tx(1, TxKind::Expense, "3000", (2025, 6, 2), None),
            tx(2, TxKind::Expense, "2000", (2025, 6, 9), None),
            tx(3, TxKind::Income, "40000", (2025, 6, 1), None),
        ];
        let budget = Some(Decimal::from(10_000));
        let state = calculate_state(&ledger, budget, today, &EngineConfig::default());

        assert_eq!(state.month_expense_total, Decimal::from(5000));
        assert_eq!(state.month_income_total, Decimal::from(40_000));
        assert_eq!(state.daily_burn_rate, Decimal::from(500));
        assert_eq!(state.projected_end_of_month_balance, Decimal::from(-5000));
        assert_eq!(state.balance_remaining, Decimal::from(5000));
        assert_eq!(state.safety_level, SafetyLevel::Critical);
        assert_eq!((state.day_of_month, state.days_in_month), (10, 30));
    }

    #[test]
    fn other_months_do_not_leak_in() {
        let today = day(2025, 6, 15);
        let ledger = vec![
            tx(1, TxKind::Expense, "100", (2025, 5, 31), None),
            tx(2, TxKind::Expense, "250.50", (2025, 6, 1), None),
            tx(3, TxKind::Expense, "100", (2024, 6, 15), None),
            tx(4, TxKind::Expense, "49.50", (2025, 6, 15), None),
        ];
        let state = calculate_state(&ledger, None, today, &EngineConfig::default());
        assert_eq!(state.month_expense_total, Decimal::from(300));
    }

    #[test]
    fn warning_band_sits_below_fifteen_percent() {
        // 30-day month, day 15: burn 440/day projects 13200 of 15000 (12% left).
        let today = day(2025, 9, 15);
        let ledger = vec![tx(1, TxKind::Expense, "6600", (2025, 9, 3), None)];
        let state = calculate_state(
            &ledger,
            Some(Decimal::from(15_000)),
            today,
            &EngineConfig::default(),
        );
        assert_eq!(state.projected_end_of_month_balance, Decimal::from(1800));
        assert_eq!(state.safety_level, SafetyLevel::Warning);

        let calm = vec![tx(1, TxKind::Expense, "3000", (2025, 9, 3), None)];
        let state = calculate_state(
            &calm,
            Some(Decimal::from(15_000)),
            today,
            &EngineConfig::default(),
        );
        assert_eq!(state.safety_level, SafetyLevel::Stable);
    }

    #[test]
    fn missing_or_zero_budget_is_stable() {
        let today = day(2025, 6, 10);
        let ledger = vec![tx(1, TxKind::Expense, "900", (2025, 6, 2), None)];
        for budget in [None, Some(Decimal::ZERO), Some(Decimal::from(-50))] {
            let state = calculate_state(&ledger, budget, today, &EngineConfig::default());
            assert_eq!(state.safety_level, SafetyLevel::Stable);
            assert_eq!(state.balance_remaining, Decimal::from(-900));
            assert_eq!(state.projected_end_of_month_balance, Decimal::from(-2700));
        }
    }

    #[test]
    fn empty_ledger_on_first_day() {
        let state = calculate_state(
            &[],
            Some(Decimal::from(1000)),
            day(2025, 2, 1),
            &EngineConfig::default(),
        );
        assert_eq!(state.daily_burn_rate, Decimal::ZERO);
        assert_eq!(state.projected_end_of_month_balance, Decimal::from(1000));
        assert_eq!(state.safety_level, SafetyLevel::Stable);
    }
}
