pub mod logging;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Returns `None` when the trimmed value is empty.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
