use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::{PrintHistoryEntry, WorklistEntry};
use crate::settings::LabelTemplate;
use crate::utils::new_id;

pub const HISTORY_CAPACITY: usize = 100;

/// Print log, newest record first. Holds at most [`HISTORY_CAPACITY`]
/// records; recording past that drops the oldest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrintHistory {
    records: Vec<PrintHistoryEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub prints: usize,
    pub labels: u64,
}

impl PrintHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(mut records: Vec<PrintHistoryEntry>) -> Self {
        records.truncate(HISTORY_CAPACITY);
        Self { records }
    }

    pub fn records(&self) -> &[PrintHistoryEntry] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(
        &mut self,
        entries: &[WorklistEntry],
        template: LabelTemplate,
    ) -> &PrintHistoryEntry {
        let total_labels = entries.iter().map(|e| u64::from(e.quantity)).sum();
        self.records.insert(
            0,
            PrintHistoryEntry {
                id: new_id(),
                printed_at: Utc::now(),
                entries: entries.to_vec(),
                total_labels,
                template,
            },
        );
        self.records.truncate(HISTORY_CAPACITY);
        &self.records[0]
    }

    pub fn find(&self, id: &str) -> Option<&PrintHistoryEntry> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Case-insensitive match against the print date (`YYYY-MM-DD`) and the
    /// code, label and location of every printed entry.
    pub fn search(&self, term: &str) -> Vec<&PrintHistoryEntry> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|record| {
                record.printed_at.format("%Y-%m-%d").to_string().contains(&term)
                    || record.entries.iter().any(|e| {
                        format!("{} {} {}", e.article_code, e.label, e.location)
                            .to_lowercase()
                            .contains(&term)
                    })
            })
            .collect()
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            prints: self.records.len(),
            labels: self.records.iter().map(|r| r.total_labels).sum(),
        }
    }
}
