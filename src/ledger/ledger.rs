use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::errors::{FinanceError, Result};

use super::transaction::{Transaction, TransactionKind};

/// In-memory owner of all transactions for the session. Queries are pure
/// O(n) scans; the collection is small and correctness wins over speed.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Appends a transaction. Values that no longer satisfy the construction
    /// contract (possible only via deserialization paths) are rejected.
    pub fn add(&mut self, transaction: Transaction) -> Result<Uuid> {
        if !transaction.is_valid() {
            return Err(FinanceError::TypeMismatch(format!(
                "transaction {} violates the amount invariant",
                transaction.id
            )));
        }
        let id = transaction.id;
        self.transactions.push(transaction);
        Ok(id)
    }

    /// Removes the transaction with the matching id. Absent ids are a no-op
    /// returning false, not an error.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|txn| txn.id != id);
        self.transactions.len() != before
    }

    /// Defensive copy of the full collection.
    pub fn all(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn by_kind(&self, kind: TransactionKind) -> Vec<Transaction> {
        self.filtered(|txn| txn.kind == kind)
    }

    pub fn by_category(&self, category: &str) -> Vec<Transaction> {
        self.filtered(|txn| txn.category == category)
    }

    /// Transactions with `start <= date <= end`, both ends inclusive.
    pub fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Transaction> {
        self.filtered(|txn| start <= txn.date && txn.date <= end)
    }

    pub fn by_month(&self, month: u32, year: i32) -> Vec<Transaction> {
        self.filtered(|txn| txn.date.month() == month && txn.date.year() == year)
    }

    /// Sum of all income and all expense amounts, in that order.
    pub fn totals(&self) -> (f64, f64) {
        let mut income = 0.0;
        let mut expense = 0.0;
        for txn in &self.transactions {
            match txn.kind {
                TransactionKind::Income => income += txn.amount,
                TransactionKind::Expense => expense += txn.amount,
            }
        }
        (income, expense)
    }

    pub fn balance(&self) -> f64 {
        let (income, expense) = self.totals();
        income - expense
    }

    /// Totals grouped by category label, optionally restricted to one kind.
    pub fn category_totals(&self, kind: Option<TransactionKind>) -> HashMap<String, f64> {
        let mut totals = HashMap::new();
        for txn in &self.transactions {
            if kind.is_some_and(|wanted| txn.kind != wanted) {
                continue;
            }
            *totals.entry(txn.category.clone()).or_insert(0.0) += txn.amount;
        }
        totals
    }

    /// Replaces the collection wholesale. Used when rehydrating from storage.
    pub fn replace_all(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
    }

    fn filtered(&self, keep: impl Fn(&Transaction) -> bool) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|txn| keep(txn))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(kind: TransactionKind, amount: f64, category: &str, date: (i32, u32, u32)) -> Transaction {
        Transaction::new(
            kind,
            amount,
            category,
            "",
            Some(NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn add_then_all_contains_exactly_the_added_record() {
        let mut ledger = Ledger::new();
        let entry = txn(TransactionKind::Income, 100.0, "Salary", (2024, 1, 2));
        let id = ledger.add(entry.clone()).unwrap();
        assert_eq!(ledger.all(), vec![entry]);

        assert!(ledger.delete(id));
        assert!(ledger.all().is_empty());
    }

    #[test]
    fn deleting_absent_id_is_a_noop() {
        let mut ledger = Ledger::new();
        ledger
            .add(txn(TransactionKind::Expense, 5.0, "Food", (2024, 1, 2)))
            .unwrap();
        assert!(!ledger.delete(Uuid::new_v4()));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn totals_and_balance() {
        let mut ledger = Ledger::new();
        ledger
            .add(txn(TransactionKind::Income, 100.0, "Salary", (2024, 1, 5)))
            .unwrap();
        ledger
            .add(txn(TransactionKind::Income, 50.0, "Gift", (2024, 1, 6)))
            .unwrap();
        ledger
            .add(txn(TransactionKind::Expense, 30.0, "Food", (2024, 1, 7)))
            .unwrap();

        assert_eq!(ledger.totals(), (150.0, 30.0));
        assert_eq!(ledger.balance(), 120.0);
    }

    #[test]
    fn category_totals_accumulate_per_label() {
        let mut ledger = Ledger::new();
        ledger
            .add(txn(TransactionKind::Expense, 20.0, "Food", (2024, 2, 1)))
            .unwrap();
        ledger
            .add(txn(TransactionKind::Expense, 30.0, "Food", (2024, 2, 2)))
            .unwrap();
        ledger
            .add(txn(TransactionKind::Expense, 10.0, "Transport", (2024, 2, 3)))
            .unwrap();

        let totals = ledger.category_totals(None);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["Food"], 50.0);
        assert_eq!(totals["Transport"], 10.0);
    }

    #[test]
    fn category_totals_honor_kind_filter() {
        let mut ledger = Ledger::new();
        ledger
            .add(txn(TransactionKind::Income, 75.0, "Salary", (2024, 2, 1)))
            .unwrap();
        ledger
            .add(txn(TransactionKind::Expense, 25.0, "Food", (2024, 2, 1)))
            .unwrap();

        let income_only = ledger.category_totals(Some(TransactionKind::Income));
        assert_eq!(income_only.len(), 1);
        assert_eq!(income_only["Salary"], 75.0);
    }

    #[test]
    fn filters_are_pure_and_inclusive() {
        let mut ledger = Ledger::new();
        ledger
            .add(txn(TransactionKind::Expense, 10.0, "Food", (2024, 3, 1)))
            .unwrap();
        ledger
            .add(txn(TransactionKind::Expense, 20.0, "Bills", (2024, 3, 31)))
            .unwrap();
        ledger
            .add(txn(TransactionKind::Income, 99.0, "Salary", (2024, 4, 1)))
            .unwrap();

        let march = ledger.by_month(3, 2024);
        assert_eq!(march.len(), 2);

        let range = ledger.by_date_range(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        assert_eq!(range.len(), 2);

        assert_eq!(ledger.by_kind(TransactionKind::Income).len(), 1);
        assert_eq!(ledger.by_category("Bills").len(), 1);
        assert_eq!(ledger.len(), 3);
    }
}
