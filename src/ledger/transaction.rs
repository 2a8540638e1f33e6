use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FinanceError, Result};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One dated income or expense entry. Immutable after creation; editing is
/// modeled as delete plus recreate.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl Transaction {
    /// Creates a transaction with a freshly minted id. The public creation
    /// path never accepts an externally supplied id.
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: Option<NaiveDate>,
    ) -> Result<Self> {
        validate_amount(amount)?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            category: category.into(),
            description: description.into(),
            date: date.unwrap_or_else(|| Local::now().date_naive()),
        })
    }

    /// Reconstructs a previously stored transaction, keeping its assigned id.
    /// Only the storage layer should call this.
    pub fn rehydrate(
        id: Uuid,
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self> {
        validate_amount(amount)?;
        Ok(Self {
            id,
            kind,
            amount,
            category: category.into(),
            description: description.into(),
            date,
        })
    }

    /// True when the stored fields still satisfy the construction contract.
    pub fn is_valid(&self) -> bool {
        validate_amount(self.amount).is_ok()
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(FinanceError::InvalidTransaction(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(())
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: ${:.2} ({}) - {}",
            self.date, self.kind, self.amount, self.category, self.description
        )
    }
}
