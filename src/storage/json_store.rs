use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    errors::{FinanceError, Result},
    ledger::{CategorySet, Transaction, TransactionKind},
    utils::ensure_dir,
};

use super::{FixedDepthRetention, RetentionPolicy};

const RECORDS_FILE: &str = "transactions.json";
const CATEGORIES_FILE: &str = "categories.json";
const BACKUP_DIR: &str = "backups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%f";

/// Durable JSON store for the ledger's records and the category set, with
/// backup rotation on every overwrite. Whole-file writes only; a single
/// process owns the files for its entire lifetime.
pub struct JsonStore {
    root: PathBuf,
    backups_dir: PathBuf,
    records_file: PathBuf,
    categories_file: PathBuf,
    retention: Box<dyn RetentionPolicy>,
}

impl JsonStore {
    /// Opens (and seeds, when absent) the store under `root`, falling back to
    /// `FINTRACK_HOME` or `~/.fintrack`. The category seed is written only
    /// when no categories file exists yet.
    pub fn new(
        root: Option<PathBuf>,
        seed: &CategorySet,
        retention: Box<dyn RetentionPolicy>,
    ) -> Result<Self> {
        let root = root.unwrap_or_else(crate::utils::app_data_dir);
        ensure_dir(&root).map_err(write_err)?;
        let backups_dir = root.join(BACKUP_DIR);
        ensure_dir(&backups_dir).map_err(write_err)?;
        let store = Self {
            records_file: root.join(RECORDS_FILE),
            categories_file: root.join(CATEGORIES_FILE),
            root,
            backups_dir,
            retention,
        };
        if !store.records_file.exists() {
            store.write_records_document(&[])?;
        }
        if !store.categories_file.exists() {
            store.write_categories_document(seed)?;
        }
        Ok(store)
    }

    pub fn new_default() -> Result<Self> {
        Self::new(
            None,
            &CategorySet::default(),
            Box::<FixedDepthRetention>::default(),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn records_file_name(&self) -> &str {
        RECORDS_FILE
    }

    pub fn categories_file_name(&self) -> &str {
        CATEGORIES_FILE
    }

    /// Backs up the current records file, then overwrites it with the given
    /// records plus refreshed metadata.
    pub fn save_records(&self, records: &[Transaction]) -> Result<()> {
        self.backup_existing(&self.records_file)?;
        self.write_records_document(records)
    }

    /// Raw stored projections. Read failures degrade to an empty list with a
    /// diagnostic; one corrupt entry must never cost the rest of the ledger,
    /// so per-entry reconstruction happens upstream via [`parse_stored`].
    pub fn load_records(&self) -> Vec<serde_json::Value> {
        let data = match fs::read_to_string(&self.records_file) {
            Ok(data) => data,
            Err(err) => {
                warn!("could not read {}: {err}", self.records_file.display());
                return Vec::new();
            }
        };
        match serde_json::from_str::<RecordsDocument>(&data) {
            Ok(document) => document.records,
            Err(err) => {
                warn!("could not parse {}: {err}", self.records_file.display());
                Vec::new()
            }
        }
    }

    pub fn save_categories(&self, categories: &CategorySet) -> Result<()> {
        self.backup_existing(&self.categories_file)?;
        self.write_categories_document(categories)
    }

    /// The stored category groups, or `None` (with a diagnostic) when the
    /// file is absent or unreadable so callers can keep their defaults.
    pub fn load_categories(&self) -> Option<CategorySet> {
        let data = match fs::read_to_string(&self.categories_file) {
            Ok(data) => data,
            Err(err) => {
                warn!("could not read {}: {err}", self.categories_file.display());
                return None;
            }
        };
        match serde_json::from_str::<CategoriesDocument>(&data) {
            Ok(document) => Some(CategorySet {
                income: document.income,
                expense: document.expense,
            }),
            Err(err) => {
                warn!("could not parse {}: {err}", self.categories_file.display());
                None
            }
        }
    }

    /// One-shot flattening of records to a CSV table with a fixed column
    /// order.
    pub fn export_csv(&self, records: &[Transaction], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent).map_err(write_err)?;
        }
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        writer
            .write_record(["Date", "Type", "Amount", "Category", "Description"])
            .map_err(csv_err)?;
        for record in records {
            writer
                .write_record([
                    record.date.to_string(),
                    record.kind.label().to_string(),
                    format!("{:.2}", record.amount),
                    record.category.clone(),
                    record.description.clone(),
                ])
                .map_err(csv_err)?;
        }
        writer.flush().map_err(write_err)?;
        Ok(())
    }

    fn write_records_document(&self, records: &[Transaction]) -> Result<()> {
        let document = RecordsDocument {
            records: records
                .iter()
                .map(|record| {
                    serde_json::to_value(StoredRecord::from(record))
                        .map_err(|err| FinanceError::StorageWrite(err.to_string()))
                })
                .collect::<Result<Vec<_>>>()?,
            metadata: RecordsMetadata {
                last_updated: Utc::now(),
                count: records.len(),
            },
        };
        self.write_json(&self.records_file, &document)
    }

    fn write_categories_document(&self, categories: &CategorySet) -> Result<()> {
        let document = CategoriesDocument {
            income: categories.income.clone(),
            expense: categories.expense.clone(),
            metadata: CategoriesMetadata {
                last_updated: Utc::now(),
            },
        };
        self.write_json(&self.categories_file, &document)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let json =
            serde_json::to_string_pretty(value).map_err(|err| write_err_msg(err.to_string()))?;
        fs::write(path, json).map_err(write_err)?;
        Ok(())
    }

    /// Copies the current on-disk file into the backup directory under a
    /// sortable timestamped name, then applies the retention policy.
    fn backup_existing(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| write_err_msg(format!("invalid store path {}", path.display())))?;
        ensure_dir(&self.backups_dir).map_err(write_err)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let backup_path = self
            .backups_dir
            .join(format!("{file_name}.{timestamp}.backup"));
        fs::copy(path, &backup_path).map_err(write_err)?;
        self.retention.prune(&self.backups_dir, file_name)
    }
}

/// Reconstructs one stored projection, preserving its assigned id. Any
/// failure marks that single entry as malformed.
pub fn parse_stored(value: &serde_json::Value) -> Result<Transaction> {
    let stored: StoredRecord = serde_json::from_value(value.clone())
        .map_err(|err| FinanceError::MalformedRecord(err.to_string()))?;
    Transaction::rehydrate(
        stored.id,
        stored.kind,
        stored.amount,
        stored.category,
        stored.description,
        stored.date,
    )
    .map_err(|err| FinanceError::MalformedRecord(err.to_string()))
}

/// Wire shape of one record inside the records document.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl From<&Transaction> for StoredRecord {
    fn from(record: &Transaction) -> Self {
        Self {
            id: record.id,
            kind: record.kind,
            amount: record.amount,
            category: record.category.clone(),
            description: record.description.clone(),
            date: record.date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordsDocument {
    records: Vec<serde_json::Value>,
    metadata: RecordsMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordsMetadata {
    last_updated: DateTime<Utc>,
    count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct CategoriesDocument {
    income: Vec<String>,
    expense: Vec<String>,
    metadata: CategoriesMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct CategoriesMetadata {
    last_updated: DateTime<Utc>,
}

fn write_err(err: std::io::Error) -> FinanceError {
    FinanceError::StorageWrite(err.to_string())
}

fn write_err_msg(message: String) -> FinanceError {
    FinanceError::StorageWrite(message)
}

fn csv_err(err: csv::Error) -> FinanceError {
    FinanceError::StorageWrite(err.to_string())
}
