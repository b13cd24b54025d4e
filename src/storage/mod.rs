//! Whole-collection persistence behind fixed string keys.
//!
//! Every mutating session call rewrites the affected collections in full.
//! There is no transaction across keys; a failed write leaves the in-memory
//! session authoritative for the rest of the run.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

mod memory;
mod migrations;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub mod keys {
    pub const DATABASE: &str = "labelDatabase";
    pub const WORKLIST: &str = "labelsToPrint";
    pub const HISTORY: &str = "printHistory";
    pub const PRINT_SETS: &str = "printSets";
    pub const SETTINGS: &str = "labelSettings";
}

pub trait LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Serializes `value` and writes it under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn LocalStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let serialized =
        serde_json::to_string(value).with_context(|| format!("failed to serialize {key}"))?;
    store
        .set(key, &serialized)
        .with_context(|| format!("failed to write {key}"))
}

/// Reads `key`, falling back to `T::default()` when it is absent or does not
/// parse. Unreadable data is logged and otherwise ignored.
pub fn load_json<T: DeserializeOwned + Default>(store: &dyn LocalStore, key: &str) -> T {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(err) => {
            log_warn!("failed to read {key}: {err:#}");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            log_warn!("discarding unreadable {key}: {err}");
            T::default()
        }
    }
}
