//! Product database rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::artikel::ArticleCode;

/// One product in the catalog. Duplicate detection compares
/// `(article_code, label, location)` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub article_code: ArticleCode,
    pub label: String,
    pub location: String,
    pub added_date: NaiveDate,
}

impl CatalogItem {
    pub fn matches(&self, code: &ArticleCode, label: &str, location: &str) -> bool {
        &self.article_code == code && self.label == label && self.location == location
    }
}

/// Raw three-column row as delivered by the import collaborator or the
/// "add to database" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    pub article_code: String,
    pub label: String,
    pub location: String,
}

impl ItemInput {
    pub fn new(
        article_code: impl Into<String>,
        label: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            article_code: article_code.into(),
            label: label.into(),
            location: location.into(),
        }
    }
}
