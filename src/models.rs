// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Label used when a transaction carries no category.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Expense,
    Income,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Expense => "expense",
            TxKind::Income => "income",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TxKind::Expense),
            "income" => Ok(TxKind::Income),
            other => Err(LedgerError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: TxKind,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TxKind::Expense
    }

    pub fn category_label(&self) -> &str {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED)
    }
}

/// A transaction that has not been written to the ledger yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TxKind,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: Option<String>,
}

impl NewTransaction {
    /// Ingestion checks. The engine itself never validates amounts.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub streak: u32,
    pub last_done: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLog {
    pub date: NaiveDate,
    pub habits: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(desc: &str, amount: Decimal) -> NewTransaction {
        NewTransaction {
            kind: TxKind::Expense,
            description: desc.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            category: None,
        }
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(" Expense ".parse::<TxKind>().unwrap(), TxKind::Expense);
        assert_eq!("INCOME".parse::<TxKind>().unwrap(), TxKind::Income);
        assert!(matches!(
            "transfer".parse::<TxKind>(),
            Err(LedgerError::UnknownKind(k)) if k == "transfer"
        ));
    }

    #[test]
    fn validate_rejects_blank_description_and_bad_amounts() {
        assert!(draft("Coffee", Decimal::new(350, 2)).validate().is_ok());
        assert!(matches!(
            draft("   ", Decimal::ONE).validate(),
            Err(LedgerError::EmptyDescription)
        ));
        assert!(matches!(
            draft("Refund", Decimal::ZERO).validate(),
            Err(LedgerError::NonPositiveAmount(_))
        ));
        assert!(draft("Refund", Decimal::new(-5, 0)).validate().is_err());
    }

    #[test]
    fn blank_category_falls_back_to_uncategorized() {
        let mut tx = Transaction {
            id: 1,
            kind: TxKind::Expense,
            description: "Bus".into(),
            amount: Decimal::ONE,
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            category: Some("  ".into()),
        };
        assert_eq!(tx.category_label(), UNCATEGORIZED);
        tx.category = Some("Travel".into());
        assert_eq!(tx.category_label(), "Travel");
    }
}
