// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{
    DEFAULT_UTC_OFFSET_MINUTES, ENGINE_KEYS, EngineConfig, UTC_OFFSET_KEY, set_reporting_offset,
};
use crate::error::LedgerError;
use crate::utils::{delete_setting, get_setting, maybe_print_json, pretty_table, set_setting};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let entries = current_settings(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
                let rows = entries
                    .into_iter()
                    .map(|e| vec![e.key, e.value, e.source.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Key", "Value", "Source"], rows));
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap().trim();
            set_config(conn, key, value)?;
            println!("Set {} = {}", key, value);
        }
        Some(("reset", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            ensure_known(key)?;
            if delete_setting(conn, key)? {
                println!("Reset {} to its default", key);
            } else {
                println!("{} already uses its default", key);
            }
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    pub source: &'static str,
}

fn ensure_known(key: &str) -> Result<(), LedgerError> {
    if key == UTC_OFFSET_KEY || ENGINE_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(LedgerError::InvalidSetting {
            key: key.to_string(),
            value: String::new(),
            reason: format!(
                "unknown setting (known: {}, {})",
                UTC_OFFSET_KEY,
                ENGINE_KEYS.join(", ")
            ),
        })
    }
}

/// Validates and stores one setting.
pub fn set_config(conn: &Connection, key: &str, value: &str) -> Result<()> {
    ensure_known(key)?;
    if key == UTC_OFFSET_KEY {
        set_reporting_offset(conn, value)?;
    } else {
        EngineConfig::default().apply(key, value)?;
        set_setting(conn, key, value)?;
    }
    info!(key, value, "setting updated");
    Ok(())
}

pub fn current_settings(conn: &Connection) -> Result<Vec<SettingEntry>> {
    let mut out = Vec::new();
    let offset = get_setting(conn, UTC_OFFSET_KEY)?;
    out.push(SettingEntry {
        key: UTC_OFFSET_KEY.to_string(),
        source: if offset.is_some() { "override" } else { "default" },
        value: offset.unwrap_or_else(|| DEFAULT_UTC_OFFSET_MINUTES.to_string()),
    });
    let cfg = EngineConfig::load(conn)?;
    for (key, value) in cfg.entries() {
        let source = if get_setting(conn, key)?.is_some() {
            "override"
        } else {
            "default"
        };
        out.push(SettingEntry {
            key: key.to_string(),
            value,
            source,
        });
    }
    Ok(out)
}
