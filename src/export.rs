use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{LabelError, LabelResult};
use crate::models::{CatalogItem, PrintHistoryEntry, WorklistEntry};
use crate::print::PrintHistory;
use crate::settings::LabelTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Catalog row as it appears in exported files: code in display form, date
/// as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Artikel")]
    article: String,
    #[serde(rename = "Nazov")]
    label: &'a str,
    #[serde(rename = "Polica")]
    location: &'a str,
    #[serde(rename = "DatumPridania")]
    added_date: String,
}

impl<'a> From<&'a CatalogItem> for ExportRow<'a> {
    fn from(item: &'a CatalogItem) -> Self {
        Self {
            article: item.article_code.display(),
            label: &item.label,
            location: &item.location,
            added_date: item.added_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One printed worklist entry, repeated with its print's date, time,
/// template and total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct HistoryRow<'a> {
    #[serde(rename = "Datum")]
    date: String,
    #[serde(rename = "Cas")]
    time: String,
    #[serde(rename = "Sablona")]
    template: LabelTemplate,
    #[serde(rename = "CelkemStitkov")]
    total_labels: u64,
    #[serde(rename = "Artikel")]
    article: String,
    #[serde(rename = "Nazov")]
    label: &'a str,
    #[serde(rename = "Polica")]
    location: &'a str,
    #[serde(rename = "Mnozstvo")]
    quantity: u32,
}

impl<'a> HistoryRow<'a> {
    fn for_record(record: &'a PrintHistoryEntry) -> impl Iterator<Item = HistoryRow<'a>> {
        let date = record.printed_at.format("%d.%m.%Y").to_string();
        let time = record.printed_at.format("%H:%M:%S").to_string();
        record.entries.iter().map(move |entry| HistoryRow {
            date: date.clone(),
            time: time.clone(),
            template: record.template,
            total_labels: record.total_labels,
            article: entry.article_code.display(),
            label: &entry.label,
            location: &entry.location,
            quantity: entry.quantity,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub filename: String,
    pub content: String,
}

/// Renders the catalog in `format`. An empty catalog is rejected.
pub fn export_catalog(
    catalog: &Catalog,
    format: ExportFormat,
    date: &str,
) -> LabelResult<ExportedFile> {
    if catalog.is_empty() {
        return Err(LabelError::InvalidInput("no data to export".into()));
    }

    let rows: Vec<ExportRow<'_>> = catalog.items().iter().map(ExportRow::from).collect();
    let content = match format {
        ExportFormat::Csv => rows_to_csv(&rows),
        ExportFormat::Json => serde_json::to_string_pretty(&rows).context("failed to encode JSON"),
    }
    .map_err(|err| LabelError::Export(format!("{err:#}")))?;

    Ok(ExportedFile {
        filename: format!("label_database_{date}.{}", format.extension()),
        content,
    })
}

/// One CSV row per printed entry, newest print first. An empty history is
/// rejected.
pub fn export_history(history: &PrintHistory, date: &str) -> LabelResult<ExportedFile> {
    if history.is_empty() {
        return Err(LabelError::InvalidInput("no print history to export".into()));
    }

    let rows: Vec<HistoryRow<'_>> = history
        .records()
        .iter()
        .flat_map(HistoryRow::for_record)
        .collect();
    let content = rows_to_csv(&rows).map_err(|err| LabelError::Export(format!("{err:#}")))?;

    Ok(ExportedFile {
        filename: format!("historia_tlace_{date}.csv"),
        content,
    })
}

/// CSV with a UTF-8 BOM so spreadsheet tools pick the right encoding.
fn rows_to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("failed to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush CSV writer: {}", err.error()))?;
    let body = String::from_utf8(bytes).context("CSV output is not UTF-8")?;
    Ok(format!("\u{FEFF}{body}"))
}

pub fn export_worklist(entries: &[WorklistEntry]) -> Result<String> {
    serde_json::to_string_pretty(entries).context("failed to encode worklist")
}
