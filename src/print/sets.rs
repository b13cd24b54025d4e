use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, LabelResult};
use crate::models::WorklistEntry;

/// Named worklist snapshots. Saving under an existing name overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrintSets {
    sets: BTreeMap<String, Vec<WorklistEntry>>,
}

impl PrintSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sets.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<&[WorklistEntry]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    pub fn save(&mut self, name: &str, entries: &[WorklistEntry]) -> LabelResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LabelError::InvalidInput("print set name is required".into()));
        }
        if entries.is_empty() {
            return Err(LabelError::InvalidInput("no labels to save".into()));
        }
        self.sets.insert(name.to_string(), entries.to_vec());
        Ok(())
    }

    /// Copies of the saved entries under fresh ids.
    pub fn load(&self, name: &str) -> LabelResult<Vec<WorklistEntry>> {
        let saved = self
            .sets
            .get(name)
            .ok_or_else(|| LabelError::UnknownPrintSet(name.to_string()))?;
        Ok(saved
            .iter()
            .map(WorklistEntry::duplicate_with_fresh_id)
            .collect())
    }

    pub fn delete(&mut self, name: &str) -> LabelResult<()> {
        self.sets
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| LabelError::UnknownPrintSet(name.to_string()))
    }
}
