use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// Named groups of category labels used for data-entry guidance. Membership
/// is advisory; the ledger never enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySet {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl CategorySet {
    pub fn empty() -> Self {
        Self {
            income: Vec::new(),
            expense: Vec::new(),
        }
    }

    pub fn labels(&self, kind: TransactionKind) -> &[String] {
        match kind {
            TransactionKind::Income => &self.income,
            TransactionKind::Expense => &self.expense,
        }
    }

    /// Appends a new label to the group for `kind`. Returns false when the
    /// label is already present; the set is never reordered.
    pub fn add(&mut self, kind: TransactionKind, label: impl Into<String>) -> bool {
        let label = label.into();
        let group = match kind {
            TransactionKind::Income => &mut self.income,
            TransactionKind::Expense => &mut self.expense,
        };
        if group.iter().any(|existing| existing == &label) {
            return false;
        }
        group.push(label);
        true
    }
}

impl Default for CategorySet {
    /// Built-in seed groups matching the tracker's stock categories.
    fn default() -> Self {
        let labels = |names: &[&str]| names.iter().map(|name| name.to_string()).collect();
        Self {
            income: labels(&[
                "Salary",
                "Business",
                "Freelance",
                "Investment",
                "Gift",
                "Other",
            ]),
            expense: labels(&[
                "Food",
                "Transport",
                "Bills",
                "Entertainment",
                "Shopping",
                "Healthcare",
                "Education",
                "Housing",
                "Personal",
                "Other",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seed_has_both_groups() {
        let set = CategorySet::default();
        assert!(set.income.contains(&"Salary".to_string()));
        assert!(set.expense.contains(&"Food".to_string()));
    }

    #[test]
    fn add_skips_duplicates_and_keeps_order() {
        let mut set = CategorySet::empty();
        assert!(set.add(TransactionKind::Expense, "Pets"));
        assert!(set.add(TransactionKind::Expense, "Garden"));
        assert!(!set.add(TransactionKind::Expense, "Pets"));
        assert_eq!(set.labels(TransactionKind::Expense), ["Pets", "Garden"]);
        assert!(set.labels(TransactionKind::Income).is_empty());
    }
}
