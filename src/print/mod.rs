//! What the print and export collaborators receive: the worklist expanded to
//! one unit per copy, each with its text lines and barcode payload.

pub mod history;
pub mod sets;

pub use history::{HistoryStats, PrintHistory, HISTORY_CAPACITY};
pub use sets::PrintSets;

use serde::{Deserialize, Serialize};

use crate::models::{LabelKind, WorklistEntry};
use crate::settings::{LabelTemplate, UserSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitLayout {
    Standard(LabelTemplate),
    NameTag,
    Shelf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintUnit {
    pub entry_id: String,
    /// 1-based copy number within the entry.
    pub copy: u32,
    pub layout: UnitLayout,
    pub headline: String,
    pub title: String,
    pub footer: Option<String>,
    pub barcode: String,
}

impl PrintUnit {
    fn for_entry(entry: &WorklistEntry, settings: &UserSettings, copy: u32) -> Self {
        let (layout, headline, title, footer) = match &entry.kind {
            LabelKind::Standard => (
                UnitLayout::Standard(settings.current_template),
                entry.article_code.display(),
                entry.label.clone(),
                settings.show_location.then(|| entry.location.clone()),
            ),
            LabelKind::NameTag {
                first_name,
                last_name,
                personal_number,
                department,
            } => (
                UnitLayout::NameTag,
                personal_number.clone(),
                format!("{first_name} {last_name}"),
                Some(department.clone()),
            ),
            LabelKind::Shelf { fach, shelf } => (
                UnitLayout::Shelf,
                fach.clone(),
                entry.label.clone(),
                Some(format!("{fach}\t{shelf}")),
            ),
        };

        Self {
            entry_id: entry.id.clone(),
            copy,
            layout,
            headline,
            title,
            footer,
            barcode: entry.barcode_payload(),
        }
    }
}

/// One unit per copy, in worklist order.
pub fn expand(entries: &[WorklistEntry], settings: &UserSettings) -> Vec<PrintUnit> {
    entries
        .iter()
        .flat_map(|entry| {
            (1..=entry.quantity).map(move |copy| PrintUnit::for_entry(entry, settings, copy))
        })
        .collect()
}
