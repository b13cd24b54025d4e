//! Product database: the rows imported from the spreadsheet plus anything
//! added by hand.

use serde::{Deserialize, Serialize};

use crate::artikel::{self, ArticleCode};
use crate::error::{LabelError, LabelResult};
use crate::models::{CatalogItem, ItemInput};
use crate::utils::{new_id, non_blank, today};

const MIN_SEARCH_LEN: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one item from the form. All three fields are required and the
    /// exact `(code, label, location)` triple must not exist yet.
    pub fn add(&mut self, input: &ItemInput) -> LabelResult<&CatalogItem> {
        let (Some(raw_code), Some(label), Some(location)) = (
            non_blank(&input.article_code),
            non_blank(&input.label),
            non_blank(&input.location),
        ) else {
            return Err(LabelError::missing_fields());
        };

        if !artikel::is_valid(raw_code) {
            return Err(LabelError::InvalidArticle(raw_code.to_string()));
        }

        let code = artikel::canonicalize(raw_code);
        if self.items.iter().any(|i| i.matches(&code, label, location)) {
            return Err(LabelError::Duplicate);
        }

        self.items.push(CatalogItem {
            id: new_id(),
            article_code: code,
            label: label.to_string(),
            location: location.to_string(),
            added_date: today(),
        });
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        before != self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replaces the whole catalog with imported rows. Rows are taken as they
    /// come; exact duplicates inside one import are kept, as in the source
    /// sheet.
    pub fn replace_all(&mut self, rows: Vec<ItemInput>) -> usize {
        let added_date = today();
        self.items = rows
            .into_iter()
            .map(|row| CatalogItem {
                id: new_id(),
                article_code: artikel::canonicalize(&row.article_code),
                label: row.label,
                location: row.location,
                added_date,
            })
            .collect();
        self.items.len()
    }

    pub fn find_by_code(&self, raw: &str) -> Option<&CatalogItem> {
        let code = artikel::canonicalize(raw);
        self.items.iter().find(|i| i.article_code == code)
    }

    /// Case-insensitive search over code, label and location. Terms shorter
    /// than two characters match nothing. `field:value` narrows the search to
    /// one field (`polica`/`location`, `nazov`/`name`/`label`,
    /// `artikel`/`article`).
    pub fn search(&self, term: &str) -> Vec<&CatalogItem> {
        let term = term.trim().to_lowercase();
        if term.chars().count() < MIN_SEARCH_LEN {
            return Vec::new();
        }

        let filter = SearchFilter::parse(&term);
        self.items.iter().filter(|i| filter.matches(i)).collect()
    }

    /// Distinct non-blank locations, in first-seen order.
    pub fn unique_locations(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            let location = item.location.trim();
            if !location.is_empty() && !seen.contains(&location) {
                seen.push(location);
            }
        }
        seen
    }
}

enum SearchFilter<'a> {
    Any(&'a str),
    Location(&'a str),
    Label(&'a str),
    Article(&'a str),
}

impl<'a> SearchFilter<'a> {
    fn parse(term: &'a str) -> Self {
        let Some((field, value)) = term.split_once(':') else {
            return SearchFilter::Any(term);
        };
        match field.trim() {
            "polica" | "location" => SearchFilter::Location(value.trim()),
            "nazov" | "name" | "label" => SearchFilter::Label(value.trim()),
            "artikel" | "article" => SearchFilter::Article(value.trim()),
            _ => SearchFilter::Any(term),
        }
    }

    fn matches(&self, item: &CatalogItem) -> bool {
        match self {
            SearchFilter::Any(term) => {
                matches_article(item, term)
                    || item.label.to_lowercase().contains(term)
                    || item.location.to_lowercase().contains(term)
            }
            SearchFilter::Location(value) => item.location.to_lowercase().contains(value),
            SearchFilter::Label(value) => item.label.to_lowercase().contains(value),
            SearchFilter::Article(value) => matches_article(item, value),
        }
    }
}

fn matches_article(item: &CatalogItem, term: &str) -> bool {
    let needle: ArticleCode = artikel::canonicalize(term);
    let code = item.article_code.as_str().to_lowercase();
    (!needle.is_empty() && code.contains(needle.as_str()))
        || item.article_code.display().to_lowercase().contains(term)
}
