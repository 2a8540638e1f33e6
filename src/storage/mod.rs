pub mod json_store;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::errors::{FinanceError, Result};

pub use json_store::JsonStore;

pub const DEFAULT_RETENTION: usize = 5;

/// Decides which backup files survive after each save. Kept behind a trait so
/// the fixed-depth ring can be swapped for a generational scheme without
/// touching the store's save/load contract.
pub trait RetentionPolicy: Send + Sync {
    fn prune(&self, backups_dir: &Path, base_file_name: &str) -> Result<()>;
}

/// Keeps the N most recent backups per base file, newest first by
/// modification time.
pub struct FixedDepthRetention {
    depth: usize,
}

impl FixedDepthRetention {
    pub fn new(depth: usize) -> Self {
        Self {
            depth: depth.max(1),
        }
    }
}

impl Default for FixedDepthRetention {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl RetentionPolicy for FixedDepthRetention {
    fn prune(&self, backups_dir: &Path, base_file_name: &str) -> Result<()> {
        let mut backups = list_backups(backups_dir, base_file_name)?;
        if backups.len() <= self.depth {
            return Ok(());
        }
        backups.sort_by(|a, b| b.cmp(a));
        for (_, _, path) in backups.into_iter().skip(self.depth) {
            let _ = fs::remove_file(path);
        }
        Ok(())
    }
}

type BackupEntry = (SystemTime, String, PathBuf);

fn list_backups(backups_dir: &Path, base_file_name: &str) -> Result<Vec<BackupEntry>> {
    if !backups_dir.exists() {
        return Ok(Vec::new());
    }
    let prefix = format!("{base_file_name}.");
    let mut entries = Vec::new();
    let dir = fs::read_dir(backups_dir)
        .map_err(|err| FinanceError::StorageRead(err.to_string()))?;
    for entry in dir {
        let entry = entry.map_err(|err| FinanceError::StorageRead(err.to_string()))?;
        let path = entry.path();
        let name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        if !name.starts_with(&prefix) || !name.ends_with(".backup") {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        entries.push((modified, name, path));
    }
    Ok(entries)
}

/// Names of the backups currently on disk for a base file, newest first.
pub fn backup_names(backups_dir: &Path, base_file_name: &str) -> Result<Vec<String>> {
    let mut backups = list_backups(backups_dir, base_file_name)?;
    backups.sort_by(|a, b| b.cmp(a));
    Ok(backups.into_iter().map(|(_, name, _)| name).collect())
}
