use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::types::{DatedStore, EntryLog, RecoveryBook};

const STORE_VERSION: u32 = 1;

/// Daily entries file inside the data directory.
pub fn entries_path(data_dir: &Path) -> PathBuf {
    data_dir.join("entries.json")
}

/// Recovery logs file inside the data directory.
pub fn recovery_path(data_dir: &Path) -> PathBuf {
    data_dir.join("recovery.json")
}

pub fn load_entries(path: &Path) -> Result<EntryLog> {
    load_store(path, "entries")
}

pub fn save_entries(path: &Path, log: &EntryLog) -> Result<()> {
    save_store(path, log, "entries")
}

pub fn load_recovery(path: &Path) -> Result<RecoveryBook> {
    load_store(path, "recovery logs")
}

pub fn save_recovery(path: &Path, book: &RecoveryBook) -> Result<()> {
    save_store(path, book, "recovery logs")
}

/// Load a store from a JSON file
///
/// If the file doesn't exist, returns a new empty store.
/// If the file exists but has an unsupported version, returns an error.
fn load_store<T: DeserializeOwned>(path: &Path, what: &str) -> Result<DatedStore<T>> {
    if !path.exists() {
        crate::diag_verbose!("No {} at {}, starting empty", what, path.display());
        return Ok(DatedStore::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file at {}", what, path.display()))?;

    let store: DatedStore<T> = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load {} from {}", what, path.display()))?;

    if store.version != STORE_VERSION {
        anyhow::bail!("Unsupported {} version: {}", what, store.version);
    }

    Ok(store)
}

/// Save a store atomically, creating the data directory if needed.
fn save_store<T: Serialize>(path: &Path, store: &DatedStore<T>, what: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        crate::config::ensure_dir(parent)?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, store)
        .with_context(|| format!("Failed to serialize {}", what))?;

    file.commit()
        .with_context(|| format!("Failed to save {} to {}", what, path.display()))?;

    crate::diag_verbose!("Saved {} {} to {}", store.len(), what, path.display());
    Ok(())
}
