use std::path::Path;

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::Result;
use crate::storage::{json_store, JsonStore};

use super::{CategorySet, Ledger, Transaction, TransactionKind};

/// Outcome of rehydrating the ledger from storage. Entries that failed to
/// reconstruct are reported here instead of aborting the load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<String>,
}

/// Facade that coordinates ledger state, the category set, and persistence.
/// Every mutation flushes immediately; a failed flush is logged and the
/// session continues with the in-memory state intact.
pub struct LedgerManager {
    ledger: Ledger,
    categories: CategorySet,
    store: JsonStore,
}

impl LedgerManager {
    pub fn new(store: JsonStore) -> Self {
        Self {
            ledger: Ledger::new(),
            categories: CategorySet::default(),
            store,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Replaces in-memory state wholesale from storage. Each stored entry
    /// that fails to reconstruct is skipped with a warning; a missing or
    /// unreadable file degrades to an empty ledger.
    pub fn load(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        let mut transactions = Vec::new();
        for value in self.store.load_records() {
            match json_store::parse_stored(&value) {
                Ok(transaction) => transactions.push(transaction),
                Err(err) => {
                    warn!("skipping stored record: {err}");
                    report.skipped.push(err.to_string());
                }
            }
        }
        report.loaded = transactions.len();
        self.ledger.replace_all(transactions);
        if let Some(categories) = self.store.load_categories() {
            self.categories = categories;
        }
        info!(
            "loaded {} transaction(s), skipped {}",
            report.loaded,
            report.skipped.len()
        );
        report
    }

    /// Appends a transaction and flushes the ledger.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<Uuid> {
        let id = self.ledger.add(transaction)?;
        self.flush_records();
        Ok(id)
    }

    /// Deletes by id, flushing only when something was removed.
    pub fn delete_transaction(&mut self, id: Uuid) -> bool {
        let removed = self.ledger.delete(id);
        if removed {
            self.flush_records();
        }
        removed
    }

    /// Appends a category label and flushes the category set on success.
    pub fn add_category(&mut self, kind: TransactionKind, label: impl Into<String>) -> bool {
        let added = self.categories.add(kind, label);
        if added {
            if let Err(err) = self.store.save_categories(&self.categories) {
                warn!("categories not persisted: {err}");
            }
        }
        added
    }

    /// Explicit full flush of the records document.
    pub fn save(&self) -> Result<()> {
        self.store.save_records(&self.ledger.all())
    }

    pub fn export_csv(&self, path: &Path) -> Result<()> {
        self.store.export_csv(&self.ledger.all(), path)
    }

    fn flush_records(&self) {
        if let Err(err) = self.save() {
            warn!("ledger not persisted: {err}");
        }
    }
}
