use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::ledger::{Ledger, Transaction, TransactionKind};
use crate::utils::format_currency;

const RULE_WIDTH: usize = 70;

/// One category's slice of a monthly report. `share` is the percentage of
/// the kind total, 0 when the kind total itself is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: String,
    pub subtotal: f64,
    pub share: f64,
}

/// Monthly summary derived from a ledger snapshot. Building it never mutates
/// the ledger and is deterministic for unchanged contents.
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub income_groups: Vec<CategoryGroup>,
    pub expense_groups: Vec<CategoryGroup>,
}

impl MonthlyReport {
    /// Summarizes one calendar month. `None` when the month has no
    /// transactions, so renderers can say so without touching any totals.
    pub fn build(ledger: &Ledger, month: u32, year: i32) -> Option<Self> {
        let transactions = ledger.by_month(month, year);
        if transactions.is_empty() {
            return None;
        }

        let total_income = sum_kind(&transactions, TransactionKind::Income);
        let total_expense = sum_kind(&transactions, TransactionKind::Expense);

        Some(Self {
            month,
            year,
            total_income,
            total_expense,
            balance: total_income - total_expense,
            income_groups: group_by_category(&transactions, TransactionKind::Income, total_income),
            expense_groups: group_by_category(
                &transactions,
                TransactionKind::Expense,
                total_expense,
            ),
        })
    }

    /// Fixed-width text block matching the tracker's report screen.
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let thin_rule = "-".repeat(RULE_WIDTH);
        let mut out = String::new();
        let title = format!("MONTHLY REPORT - {} {}", month_name(self.month), self.year);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{title:^width$}", width = RULE_WIDTH);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "{:<20} {:>14}",
            "Total Income:",
            format_currency(self.total_income)
        );
        let _ = writeln!(
            out,
            "{:<20} {:>14}",
            "Total Expenses:",
            format_currency(self.total_expense)
        );
        let _ = writeln!(out, "{thin_rule}");
        let _ = writeln!(
            out,
            "{:<20} {:>14}",
            "Net Balance:",
            format_currency(self.balance)
        );
        if !self.income_groups.is_empty() {
            let _ = writeln!(out, "\nINCOME:");
            render_groups(&mut out, &self.income_groups);
        }
        if !self.expense_groups.is_empty() {
            let _ = writeln!(out, "\nEXPENSES:");
            render_groups(&mut out, &self.expense_groups);
        }
        let _ = writeln!(out, "{rule}");
        out
    }
}

fn sum_kind(transactions: &[Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|txn| txn.kind == kind)
        .map(|txn| txn.amount)
        .sum()
}

/// Groups one kind's transactions by category in first-appearance order,
/// then stable-sorts by descending subtotal so ties keep that order.
fn group_by_category(
    transactions: &[Transaction],
    kind: TransactionKind,
    kind_total: f64,
) -> Vec<CategoryGroup> {
    let mut groups: Vec<(String, f64)> = Vec::new();
    for txn in transactions.iter().filter(|txn| txn.kind == kind) {
        match groups.iter_mut().find(|(category, _)| *category == txn.category) {
            Some((_, subtotal)) => *subtotal += txn.amount,
            None => groups.push((txn.category.clone(), txn.amount)),
        }
    }
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups
        .into_iter()
        .map(|(category, subtotal)| CategoryGroup {
            category,
            subtotal,
            share: if kind_total > 0.0 {
                subtotal / kind_total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

fn render_groups(out: &mut String, groups: &[CategoryGroup]) {
    for group in groups {
        let _ = writeln!(
            out,
            "  {:<18} {:>12}  ({:>5.1}%)",
            group.category,
            format_currency(group.subtotal),
            group.share
        );
    }
}

fn month_name(month: u32) -> String {
    NaiveDate::from_ymd_opt(2000, month, 1)
        .map(|date| date.format("%B").to_string())
        .unwrap_or_else(|| format!("month {month}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(kind: TransactionKind, amount: f64, category: &str, day: u32) -> Transaction {
        Transaction::new(
            kind,
            amount,
            category,
            "",
            Some(NaiveDate::from_ymd_opt(2024, 6, day).unwrap()),
        )
        .unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        for entry in [
            txn(TransactionKind::Income, 1200.0, "Salary", 1),
            txn(TransactionKind::Income, 300.0, "Freelance", 10),
            txn(TransactionKind::Expense, 200.0, "Food", 4),
            txn(TransactionKind::Expense, 200.0, "Bills", 5),
            txn(TransactionKind::Expense, 50.0, "Transport", 6),
        ] {
            ledger.add(entry).unwrap();
        }
        ledger
    }

    #[test]
    fn empty_month_yields_no_report() {
        let ledger = sample_ledger();
        assert!(MonthlyReport::build(&ledger, 7, 2024).is_none());
        assert!(MonthlyReport::build(&Ledger::new(), 6, 2024).is_none());
    }

    #[test]
    fn totals_and_balance_cover_only_the_target_month() {
        let mut ledger = sample_ledger();
        ledger
            .add(
                Transaction::new(
                    TransactionKind::Expense,
                    999.0,
                    "Food",
                    "",
                    Some(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
                )
                .unwrap(),
            )
            .unwrap();

        let report = MonthlyReport::build(&ledger, 6, 2024).expect("june report");
        assert_eq!(report.total_income, 1500.0);
        assert_eq!(report.total_expense, 450.0);
        assert_eq!(report.balance, 1050.0);
    }

    #[test]
    fn groups_sort_descending_with_stable_ties() {
        let ledger = sample_ledger();
        let report = MonthlyReport::build(&ledger, 6, 2024).expect("june report");

        let categories: Vec<&str> = report
            .expense_groups
            .iter()
            .map(|group| group.category.as_str())
            .collect();
        // Food and Bills tie at 200; Food appeared first.
        assert_eq!(categories, ["Food", "Bills", "Transport"]);

        let food = &report.expense_groups[0];
        assert!((food.share - 200.0 / 450.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn income_only_month_reports_zero_expense_shares() {
        let mut ledger = Ledger::new();
        ledger
            .add(txn(TransactionKind::Income, 80.0, "Gift", 15))
            .unwrap();
        let report = MonthlyReport::build(&ledger, 6, 2024).expect("report");
        assert!(report.expense_groups.is_empty());
        assert_eq!(report.income_groups[0].share, 100.0);
    }

    #[test]
    fn render_names_the_month() {
        let ledger = sample_ledger();
        let report = MonthlyReport::build(&ledger, 6, 2024).expect("june report");
        let text = report.render();
        assert!(text.contains("MONTHLY REPORT - June 2024"));
        assert!(text.contains("Net Balance:"));
        assert!(text.contains("$1050.00"));
    }
}
