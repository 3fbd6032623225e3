// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::{FinancialState, ReportingDay, active_budget};
use crate::config::EngineConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub overspend_risk: u8,
    pub deficit_risk: u8,
    pub risk_score: u8,
}

pub fn run_risk_engine(
    state: &FinancialState,
    monthly_budget: Option<Decimal>,
    day: ReportingDay,
    config: &EngineConfig,
) -> RiskAssessment {
    let Some(budget) = active_budget(monthly_budget) else {
        return RiskAssessment::default();
    };
    let hundred = Decimal::ONE_HUNDRED;

    let budget_used_pct = percent_of(state.month_expense_total, budget);
    let days_passed_pct = percent_of(
        Decimal::from(day.day_of_month()),
        Decimal::from(day.days_in_month()),
    );
    // Spending ahead of the calendar; under-spending is not a risk.
    let overspend = budget_used_pct
        .saturating_sub(days_passed_pct)
        .max(Decimal::ZERO);

    let deficit = if state.projected_end_of_month_balance >= Decimal::ZERO {
        Decimal::ZERO
    } else {
        percent_of(state.projected_end_of_month_balance.abs(), budget).min(hundred)
    };

    let score = overspend
        .saturating_mul(config.overspend_weight)
        .saturating_add(deficit.saturating_mul(config.deficit_weight))
        .min(hundred);

    RiskAssessment {
        overspend_risk: to_percent(overspend),
        deficit_risk: to_percent(deficit),
        risk_score: to_percent(score),
    }
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .map(|ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Rounds half away from zero and clamps into `0..=100`.
fn to_percent(value: Decimal) -> u8 {
    value
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or_default()
}
