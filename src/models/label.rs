//! Labels queued for printing.

use serde::{Deserialize, Serialize};

use crate::artikel::{self, ArticleCode};
use crate::utils::new_id;

/// Caption printed on every shelf label.
pub const SHELF_CAPTION: &str = "Polica štítok";

/// Variant-specific fields. Standard labels carry nothing beyond the common
/// triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LabelKind {
    #[default]
    Standard,
    #[serde(rename_all = "camelCase")]
    NameTag {
        first_name: String,
        last_name: String,
        personal_number: String,
        department: String,
    },
    #[serde(rename_all = "camelCase")]
    Shelf { fach: String, shelf: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklistEntry {
    pub id: String,
    pub article_code: ArticleCode,
    pub label: String,
    pub location: String,
    pub quantity: u32,
    #[serde(flatten)]
    pub kind: LabelKind,
}

impl WorklistEntry {
    /// Merge identity: canonical code, label and location, compared exactly.
    pub fn key(&self) -> (&ArticleCode, &str, &str) {
        (&self.article_code, &self.label, &self.location)
    }

    /// Field-for-field copy under a new identity, so restored snapshots never
    /// alias the entries they were taken from.
    pub fn duplicate_with_fresh_id(&self) -> Self {
        Self {
            id: new_id(),
            ..self.clone()
        }
    }

    /// What the barcode on this label encodes.
    pub fn barcode_payload(&self) -> String {
        match &self.kind {
            LabelKind::Standard => artikel::for_barcode(self.article_code.as_str()),
            LabelKind::NameTag {
                personal_number, ..
            } => personal_number.clone(),
            LabelKind::Shelf { fach, shelf } => format!("{fach}\t{shelf}"),
        }
    }
}

/// A request to queue a label. The article code may still be in raw form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRequest {
    pub article_code: String,
    pub label: String,
    pub location: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub kind: LabelKind,
}

impl LabelRequest {
    pub fn standard(
        article_code: impl Into<String>,
        label: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            article_code: article_code.into(),
            label: label.into(),
            location: location.into(),
            quantity: None,
            kind: LabelKind::Standard,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Missing or zero quantities count as a single copy.
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.filter(|q| *q >= 1).unwrap_or(1)
    }
}
