use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WorklistEntry;
use crate::settings::LabelTemplate;

/// Record of one print action. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintHistoryEntry {
    pub id: String,
    pub printed_at: DateTime<Utc>,
    pub entries: Vec<WorklistEntry>,
    pub total_labels: u64,
    pub template: LabelTemplate,
}
