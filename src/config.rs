// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration kept in the `settings` table.
//!
//! Engine thresholds default to the values below and can be overridden per
//! database with `ledgerpulse config set --key engine.<name> --value <v>`.

use anyhow::Result;
use chrono::FixedOffset;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::ReportingDay;
use crate::error::LedgerError;
use crate::utils::{get_setting, set_setting};

/// Projected month-end balance below this share of the budget is a Warning.
pub const WARNING_MARGIN_PCT: i64 = 15;
pub const OVERSPEND_WEIGHT_PCT: i64 = 60;
pub const DEFICIT_WEIGHT_PCT: i64 = 40;
/// Trailing-window category total that counts as a spike.
pub const SPIKE_THRESHOLD: i64 = 5000;
/// Open interval of amounts counted as impulse purchases.
pub const IMPULSE_MIN: i64 = 100;
pub const IMPULSE_MAX: i64 = 1000;
pub const IMPULSE_COUNT_TRIGGER: usize = 5;
pub const VELOCITY_MULTIPLIER: i64 = 2;
pub const VELOCITY_FLOOR: i64 = 1000;
pub const WINDOW_DAYS: u32 = 7;

pub const UTC_OFFSET_KEY: &str = "utc_offset_minutes";
/// Asia/Kolkata, which observes no DST.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

pub const ENGINE_KEYS: &[&str] = &[
    "engine.warning_margin",
    "engine.overspend_weight",
    "engine.deficit_weight",
    "engine.spike_threshold",
    "engine.impulse_min",
    "engine.impulse_max",
    "engine.impulse_count_trigger",
    "engine.velocity_multiplier",
    "engine.velocity_floor",
    "engine.window_days",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    pub warning_margin: Decimal,
    pub overspend_weight: Decimal,
    pub deficit_weight: Decimal,
    pub spike_threshold: Decimal,
    pub impulse_min: Decimal,
    pub impulse_max: Decimal,
    pub impulse_count_trigger: usize,
    pub velocity_multiplier: Decimal,
    pub velocity_floor: Decimal,
    pub window_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            warning_margin: Decimal::new(WARNING_MARGIN_PCT, 2),
            overspend_weight: Decimal::new(OVERSPEND_WEIGHT_PCT, 2),
            deficit_weight: Decimal::new(DEFICIT_WEIGHT_PCT, 2),
            spike_threshold: Decimal::from(SPIKE_THRESHOLD),
            impulse_min: Decimal::from(IMPULSE_MIN),
            impulse_max: Decimal::from(IMPULSE_MAX),
            impulse_count_trigger: IMPULSE_COUNT_TRIGGER,
            velocity_multiplier: Decimal::from(VELOCITY_MULTIPLIER),
            velocity_floor: Decimal::from(VELOCITY_FLOOR),
            window_days: WINDOW_DAYS,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with any `engine.*` rows from `settings`.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut cfg = Self::default();
        for key in ENGINE_KEYS {
            if let Some(value) = get_setting(conn, key)? {
                cfg.apply(key, &value)?;
            }
        }
        Ok(cfg)
    }

    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        let invalid = |reason: &str| LedgerError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        let decimal = || -> Result<Decimal, LedgerError> {
            let d = value
                .trim()
                .parse::<Decimal>()
                .map_err(|_| invalid("expected a decimal"))?;
            if d < Decimal::ZERO {
                return Err(invalid("must not be negative"));
            }
            Ok(d)
        };
        match key {
            "engine.warning_margin" => self.warning_margin = decimal()?,
            "engine.overspend_weight" => self.overspend_weight = decimal()?,
            "engine.deficit_weight" => self.deficit_weight = decimal()?,
            "engine.spike_threshold" => self.spike_threshold = decimal()?,
            "engine.impulse_min" => self.impulse_min = decimal()?,
            "engine.impulse_max" => self.impulse_max = decimal()?,
            "engine.velocity_multiplier" => self.velocity_multiplier = decimal()?,
            "engine.velocity_floor" => self.velocity_floor = decimal()?,
            "engine.impulse_count_trigger" => {
                self.impulse_count_trigger = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| invalid("expected a whole number"))?;
            }
            "engine.window_days" => {
                let days = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| invalid("expected a whole number"))?;
                if days == 0 {
                    return Err(invalid("window must span at least one day"));
                }
                self.window_days = days;
            }
            _ => return Err(invalid("unknown setting")),
        }
        Ok(())
    }

    /// `(key, value)` pairs in `ENGINE_KEYS` order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (ENGINE_KEYS[0], self.warning_margin.to_string()),
            (ENGINE_KEYS[1], self.overspend_weight.to_string()),
            (ENGINE_KEYS[2], self.deficit_weight.to_string()),
            (ENGINE_KEYS[3], self.spike_threshold.to_string()),
            (ENGINE_KEYS[4], self.impulse_min.to_string()),
            (ENGINE_KEYS[5], self.impulse_max.to_string()),
            (ENGINE_KEYS[6], self.impulse_count_trigger.to_string()),
            (ENGINE_KEYS[7], self.velocity_multiplier.to_string()),
            (ENGINE_KEYS[8], self.velocity_floor.to_string()),
            (ENGINE_KEYS[9], self.window_days.to_string()),
        ]
    }
}

pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, LedgerError> {
    let invalid = |reason: &str| LedgerError::InvalidSetting {
        key: UTC_OFFSET_KEY.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let minutes = value
        .trim()
        .parse::<i32>()
        .map_err(|_| invalid("expected minutes east of UTC"))?;
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| invalid("offset out of range"))
}

pub fn reporting_offset(conn: &Connection) -> Result<FixedOffset> {
    match get_setting(conn, UTC_OFFSET_KEY)? {
        Some(v) => Ok(parse_utc_offset(&v)?),
        None => Ok(parse_utc_offset(&DEFAULT_UTC_OFFSET_MINUTES.to_string())?),
    }
}

pub fn set_reporting_offset(conn: &Connection, value: &str) -> Result<()> {
    parse_utc_offset(value)?;
    set_setting(conn, UTC_OFFSET_KEY, value.trim())
}

/// Today in the configured reporting zone.
pub fn reporting_today(conn: &Connection) -> Result<ReportingDay> {
    Ok(ReportingDay::now(reporting_offset(conn)?))
}

/// `--date` when given, otherwise today in the reporting zone.
pub fn resolve_day(conn: &Connection, date: Option<&String>) -> Result<ReportingDay> {
    match date {
        Some(s) => Ok(ReportingDay::new(crate::utils::parse_date(s.trim())?)),
        None => reporting_today(conn),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_overrides_and_validates() {
        let mut cfg = EngineConfig::default();
        cfg.apply("engine.spike_threshold", " 7500 ").unwrap();
        assert_eq!(cfg.spike_threshold, Decimal::from(7500));
        cfg.apply("engine.window_days", "14").unwrap();
        assert_eq!(cfg.window_days, 14);

        assert!(cfg.apply("engine.window_days", "0").is_err());
        assert!(cfg.apply("engine.velocity_floor", "-1").is_err());
        assert!(cfg.apply("engine.impulse_count_trigger", "many").is_err());
        assert!(cfg.apply("engine.nope", "1").is_err());
    }

    #[test]
    fn defaults_match_named_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.warning_margin.to_string(), "0.15");
        assert_eq!(cfg.overspend_weight + cfg.deficit_weight, Decimal::ONE);
        assert_eq!(cfg.entries().len(), ENGINE_KEYS.len());
    }

    #[test]
    fn utc_offset_bounds() {
        assert_eq!(parse_utc_offset("330").unwrap().local_minus_utc(), 19_800);
        assert_eq!(parse_utc_offset("-300").unwrap().local_minus_utc(), -18_000);
        assert!(parse_utc_offset("1440").is_err());
        assert!(parse_utc_offset("ist").is_err());
        assert!(parse_utc_offset("100000000").is_err());
        assert!(parse_utc_offset(&i32::MAX.to_string()).is_err());
        assert!(parse_utc_offset(&i32::MIN.to_string()).is_err());
    }
}
