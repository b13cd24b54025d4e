use serde::{Deserialize, Serialize};

use crate::artikel;
use crate::models::{LabelRequest, WorklistEntry};
use crate::utils::new_id;

/// Ordered labels waiting for the next print. Order is print order and
/// survives merges: a merge bumps the quantity of the existing entry where it
/// already stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorklistAggregator {
    entries: Vec<WorklistEntry>,
}

impl WorklistAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<WorklistEntry>) -> Self {
        let mut worklist = Self::new();
        worklist.entries = entries.into_iter().filter(|e| e.quantity >= 1).collect();
        worklist
    }

    pub fn entries(&self) -> &[WorklistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WorklistEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Adds the request's quantity to the entry with the same canonical
    /// `(code, label, location)` triple, or appends a new entry. Returns the
    /// id of the entry that now holds the copies.
    pub fn add_or_merge(&mut self, request: LabelRequest) -> String {
        let code = artikel::canonicalize(&request.article_code);
        let quantity = request.effective_quantity();

        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.key() == (&code, request.label.as_str(), request.location.as_str()))
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return existing.id.clone();
        }

        let id = new_id();
        self.entries.push(WorklistEntry {
            id: id.clone(),
            article_code: code,
            label: request.label,
            location: request.location,
            quantity,
            kind: request.kind,
        });
        id
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Returns how many entries were removed. Unknown ids are skipped.
    pub fn remove_many<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| !ids.iter().any(|id| id.as_ref() == e.id));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Quantities below one remove the entry; nothing under one is stored.
    /// Returns whether an entry was changed or removed.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> bool {
        if quantity < 1 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.position(id) {
            Some(index) => {
                self.entries[index].quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Sets the same quantity on every listed entry. The caller validates
    /// `quantity >= 1` first. Returns how many entries were updated.
    pub fn set_quantity_many<S: AsRef<str>>(&mut self, ids: &[S], quantity: u32) -> usize {
        let mut updated = 0;
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| ids.iter().any(|id| id.as_ref() == e.id))
        {
            entry.quantity = quantity;
            updated += 1;
        }
        updated
    }

    /// Moves the entry at `from` so it ends up at index `to`. An out-of-range
    /// `from` does nothing; `to` past the end means "last".
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() {
            return false;
        }
        let moved = self.entries.remove(from);
        let to = to.min(self.entries.len());
        self.entries.insert(to, moved);
        true
    }

    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Replaces the whole list with copies of `entries` under fresh ids.
    pub fn replace_with(&mut self, entries: &[WorklistEntry]) {
        self.entries = entries
            .iter()
            .filter(|e| e.quantity >= 1)
            .map(WorklistEntry::duplicate_with_fresh_id)
            .collect();
    }
}
