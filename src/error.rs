// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections raised at the ledger's ingestion boundary.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Description must not be empty")]
    EmptyDescription,
    #[error("Amount must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("Unknown transaction kind '{0}' (use expense|income)")]
    UnknownKind(String),
    #[error("Habit '{0}' already exists")]
    DuplicateHabit(String),
    #[error("Habit '{0}' not found")]
    UnknownHabit(String),
    #[error("Invalid value '{value}' for setting '{key}': {reason}")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },
}
