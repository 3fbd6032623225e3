// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::Serialize;

use super::{ReportingDay, sum_amounts};
use crate::config::EngineConfig;
use crate::models::Transaction;

/// Spending patterns over the trailing window ending on the reporting day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BehaviorReport {
    pub category_spikes: BTreeSet<String>,
    pub impulse_pattern_detected: bool,
    pub abnormal_velocity_detected: bool,
    pub recent_transaction_count: usize,
}

pub fn run_behavior_model(
    transactions: &[Transaction],
    day: ReportingDay,
    config: &EngineConfig,
) -> BehaviorReport {
    let (start, end) = day.trailing_window(config.window_days);
    let recent: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense() && t.date >= start && t.date <= end)
        .collect();

    BehaviorReport {
        category_spikes: category_spikes(&recent, config.spike_threshold),
        impulse_pattern_detected: impulse_pattern(&recent, config),
        abnormal_velocity_detected: abnormal_velocity(&recent, day, config),
        recent_transaction_count: recent.len(),
    }
}

fn category_spikes(recent: &[&Transaction], threshold: Decimal) -> BTreeSet<String> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in recent {
        let entry = totals.entry(t.category_label()).or_insert(Decimal::ZERO);
        *entry = entry.saturating_add(t.amount);
    }
    totals
        .into_iter()
        .filter(|(_, total)| *total > threshold)
        .map(|(category, _)| category.to_string())
        .collect()
}

fn impulse_pattern(recent: &[&Transaction], config: &EngineConfig) -> bool {
    let count = recent
        .iter()
        .filter(|t| t.amount > config.impulse_min && t.amount < config.impulse_max)
        .count();
    count > config.impulse_count_trigger
}

/// Today's spend against the window average. The average always divides by
/// the full window length, however many of those days have entries.
fn abnormal_velocity(recent: &[&Transaction], day: ReportingDay, config: &EngineConfig) -> bool {
    let today_spend = sum_amounts(recent.iter().copied().filter(|t| t.date == day.date()));
    let window_total = sum_amounts(recent.iter().copied());
    let average_daily = window_total
        .checked_div(Decimal::from(config.window_days.max(1)))
        .unwrap_or(Decimal::ZERO);

    today_spend > average_daily.saturating_mul(config.velocity_multiplier)
        && today_spend > config.velocity_floor
}
