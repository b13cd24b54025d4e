//! Spreadsheet boundary. The sheet is expected as a CSV export whose first
//! row is a header and whose first three columns are article code, label and
//! location.

use std::{fs, io::ErrorKind, path::Path};

use serde::Serialize;

use crate::error::{LabelError, LabelResult};
use crate::models::ItemInput;
use crate::utils::non_blank;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedRows {
    pub rows: Vec<ItemInput>,
    /// Rows dropped because one of the three fields was empty.
    pub rejected: usize,
}

/// Parses CSV text. A leading UTF-8 BOM is ignored, the header row skipped,
/// each field trimmed, and rows missing any of the three fields rejected.
/// Records may have any number of columns; only the first three are read.
pub fn parse_rows(text: &str) -> LabelResult<ImportedRows> {
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut imported = ImportedRows::default();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.map_err(|err| LabelError::Import(format!("row {}: {err}", index + 2)))?;

        let field = |i: usize| record.get(i).and_then(non_blank);
        match (field(0), field(1), field(2)) {
            (Some(code), Some(label), Some(location)) => {
                imported.rows.push(ItemInput::new(code, label, location));
            }
            _ => imported.rejected += 1,
        }
    }

    if imported.rejected > 0 {
        log_warn!("import: {} incomplete rows rejected", imported.rejected);
    }
    Ok(imported)
}

/// Reads and parses a CSV file. A missing file is reported as
/// [`LabelError::NotFound`] so the UI can word it differently from a broken
/// file.
pub fn read_file(path: &Path) -> LabelResult<ImportedRows> {
    let text = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => LabelError::NotFound(path.display().to_string()),
        _ => LabelError::Import(format!("{}: {err}", path.display())),
    })?;

    let imported = parse_rows(&text)?;
    log_info!(
        "import: {} rows read from {}",
        imported.rows.len(),
        path.display()
    );
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn skips_header_and_rejects_incomplete_rows() {
        let text = "\u{FEFF}Artikel,Nazov,Polica\n\
                    123-456, Motor ,A1\n\
                    ,Missing code,A2\n\
                    789,Nut,\n\
                    555,\"Skrutka, M6\",B3,extra\n";
        let imported = parse_rows(text).unwrap();

        assert_eq!(imported.rejected, 2);
        assert_eq!(
            imported.rows,
            vec![
                ItemInput::new("123-456", "Motor", "A1"),
                ItemInput::new("555", "Skrutka, M6", "B3"),
            ]
        );
    }

    #[test]
    fn short_rows_count_as_rejected() {
        let imported = parse_rows("a,b,c\n1,2\n").unwrap();
        assert!(imported.rows.is_empty());
        assert_eq!(imported.rejected, 1);
    }

    #[test]
    fn header_only_yields_nothing() {
        let imported = parse_rows("Artikel,Nazov,Polica\n").unwrap();
        assert_eq!(imported, ImportedRows::default());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_file(&dir.path().join("data.csv"));
        assert!(matches!(result, Err(LabelError::NotFound(_))));
    }

    #[test]
    fn reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Artikel,Nazov,Polica").unwrap();
        writeln!(file, "111,Bolt,A1").unwrap();
        let imported = read_file(file.path()).unwrap();
        assert_eq!(imported.rows.len(), 1);
    }
}
