//! Turns form input into worklist requests: quick labels, bulk code lists,
//! name tags and shelf labels.

use serde::{Deserialize, Serialize};

use super::{personal::is_valid_personal_number, WorklistAggregator};
use crate::artikel;
use crate::catalog::Catalog;
use crate::error::{LabelError, LabelResult};
use crate::models::{LabelKind, LabelRequest, SHELF_CAPTION};
use crate::utils::non_blank;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

const DEFAULT_FACH: &str = "051";
const DEFAULT_SHELF: &str = "00-00-00";
const FACH_WIDTH: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReport {
    pub processed: usize,
    pub added: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameTagInput {
    pub first_name: String,
    pub last_name: String,
    pub personal_number: String,
    #[serde(default)]
    pub department: String,
}

/// Quick-label form: all three fields required, code must be valid.
pub fn add_quick_label(
    worklist: &mut WorklistAggregator,
    article_code: &str,
    label: &str,
    location: &str,
) -> LabelResult<String> {
    let (Some(code), Some(label), Some(location)) =
        (non_blank(article_code), non_blank(label), non_blank(location))
    else {
        return Err(LabelError::missing_fields());
    };
    if !artikel::is_valid(code) {
        return Err(LabelError::InvalidArticle(code.to_string()));
    }
    Ok(worklist.add_or_merge(LabelRequest::standard(code, label, location)))
}

/// One code per line. Each valid code takes its label and location from the
/// catalog when it is known there; otherwise the raw line becomes the label
/// and the location stays empty.
pub fn add_bulk(
    worklist: &mut WorklistAggregator,
    catalog: &Catalog,
    input: &str,
) -> LabelResult<BulkReport> {
    let lines: Vec<&str> = input.lines().filter_map(non_blank).collect();
    if lines.is_empty() {
        return Err(LabelError::InvalidInput(
            "enter at least one article code".into(),
        ));
    }

    let mut report = BulkReport::default();
    for line in lines {
        report.processed += 1;
        if !artikel::is_valid(line) {
            log_warn!("bulk input: skipping invalid article code {line:?}");
            report.errors += 1;
            continue;
        }

        let request = match catalog.find_by_code(line) {
            Some(item) => LabelRequest::standard(
                item.article_code.as_str(),
                item.label.clone(),
                item.location.clone(),
            ),
            None => LabelRequest::standard(line, line, ""),
        };
        worklist.add_or_merge(request);
        report.added += 1;
    }

    log_debug!(
        "bulk input: processed={} added={} errors={}",
        report.processed,
        report.added,
        report.errors
    );
    Ok(report)
}

/// Name tags merge like any other label: personal number as the code, full
/// name as the label, department as the location.
pub fn add_name_tag(
    worklist: &mut WorklistAggregator,
    input: &NameTagInput,
) -> LabelResult<String> {
    let (Some(first_name), Some(last_name), Some(personal_number)) = (
        non_blank(&input.first_name),
        non_blank(&input.last_name),
        non_blank(&input.personal_number),
    ) else {
        return Err(LabelError::InvalidInput(
            "first name, last name and personal number are required".into(),
        ));
    };
    if !is_valid_personal_number(personal_number) {
        return Err(LabelError::InvalidPersonalNumber(personal_number.to_string()));
    }
    let department = input.department.trim();

    Ok(worklist.add_or_merge(LabelRequest {
        article_code: personal_number.to_string(),
        label: format!("{first_name} {last_name}"),
        location: department.to_string(),
        quantity: None,
        kind: LabelKind::NameTag {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            personal_number: personal_number.to_string(),
            department: department.to_string(),
        },
    }))
}

pub fn add_shelf_label(
    worklist: &mut WorklistAggregator,
    fach: &str,
    shelf: &str,
) -> LabelResult<String> {
    let (Some(fach), Some(shelf)) = (non_blank(fach), non_blank(shelf)) else {
        return Err(LabelError::InvalidInput(
            "fach and shelf are required".into(),
        ));
    };
    Ok(worklist.add_or_merge(shelf_request(fach, SHELF_CAPTION.to_string(), shelf)))
}

/// Queues one shelf label per distinct catalog location, optionally clearing
/// the worklist first. Returns how many labels were queued.
pub fn add_shelf_labels_from_catalog(
    worklist: &mut WorklistAggregator,
    catalog: &Catalog,
    replace: bool,
) -> LabelResult<usize> {
    let locations = catalog.unique_locations();
    if locations.is_empty() {
        return Err(LabelError::InvalidInput(
            "no shelves in the database to print".into(),
        ));
    }

    if replace {
        worklist.clear();
    }
    for location in &locations {
        let label = format!("Polica {location}");
        let request = match split_shelf_code(location) {
            Some((fach, shelf)) => shelf_request(fach, label, shelf),
            None => shelf_request(&fach_for_location(location), label, DEFAULT_SHELF),
        };
        worklist.add_or_merge(request);
    }
    Ok(locations.len())
}

fn shelf_request(fach: &str, label: String, shelf: &str) -> LabelRequest {
    LabelRequest {
        article_code: fach.to_string(),
        label,
        location: shelf.to_string(),
        quantity: None,
        kind: LabelKind::Shelf {
            fach: fach.to_string(),
            shelf: shelf.to_string(),
        },
    }
}

/// Splits a location already written as a shelf code, `NNN<TAB>NN-NN-NN`.
fn split_shelf_code(location: &str) -> Option<(&str, &str)> {
    let (fach, shelf) = location.split_once('\t')?;
    let fach_ok = fach.len() == FACH_WIDTH && fach.bytes().all(|b| b.is_ascii_digit());
    let shelf_ok = shelf.len() == 8
        && shelf.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    (fach_ok && shelf_ok).then_some((fach, shelf))
}

/// First run of digits in the location, left-padded to three places.
/// Locations without digits get the default compartment.
fn fach_for_location(location: &str) -> String {
    let digits: String = location
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        DEFAULT_FACH.to_string()
    } else {
        format!("{digits:0>width$}", width = FACH_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemInput;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add(&ItemInput::new("111-222-333", "Motor", "A1"))
            .unwrap();
        catalog
            .add(&ItemInput::new("444555", "Skrutka", "B12-3"))
            .unwrap();
        catalog
            .add(&ItemInput::new("777", "Matica", "Sklad"))
            .unwrap();
        catalog
    }

    #[test]
    fn quick_label_validates_fields() {
        let mut worklist = WorklistAggregator::new();
        assert!(matches!(
            add_quick_label(&mut worklist, "123", "", "A1"),
            Err(LabelError::InvalidInput(_))
        ));
        assert!(matches!(
            add_quick_label(&mut worklist, "--", "x", "A1"),
            Err(LabelError::InvalidArticle(_))
        ));
        assert!(worklist.is_empty());

        add_quick_label(&mut worklist, " 123-456 ", " Bolt ", "A1").unwrap();
        let entry = &worklist.entries()[0];
        assert_eq!(entry.article_code.as_str(), "123456");
        assert_eq!(entry.label, "Bolt");
    }

    #[test]
    fn bulk_uses_catalog_data_and_counts() {
        let mut worklist = WorklistAggregator::new();
        let input = "111222333\n\n999\n - \n111-222-333\n";
        let report = add_bulk(&mut worklist, &catalog(), input).unwrap();

        assert_eq!(
            report,
            BulkReport {
                processed: 4,
                added: 3,
                errors: 1
            }
        );
        assert_eq!(worklist.len(), 2);
        let motor = &worklist.entries()[0];
        assert_eq!(motor.label, "Motor");
        assert_eq!(motor.location, "A1");
        assert_eq!(motor.quantity, 2);

        let unknown = &worklist.entries()[1];
        assert_eq!(unknown.label, "999");
        assert_eq!(unknown.location, "");
    }

    #[test]
    fn bulk_rejects_empty_input() {
        let mut worklist = WorklistAggregator::new();
        assert!(add_bulk(&mut worklist, &catalog(), " \n \n").is_err());
    }

    #[test]
    fn name_tag_requires_valid_personal_number() {
        let mut worklist = WorklistAggregator::new();
        let input = NameTagInput {
            first_name: "Ján".into(),
            last_name: "Novák".into(),
            personal_number: "123".into(),
            department: "IT".into(),
        };
        assert!(matches!(
            add_name_tag(&mut worklist, &input),
            Err(LabelError::InvalidPersonalNumber(_))
        ));

        let input = NameTagInput {
            personal_number: "1234567890".into(),
            ..input
        };
        add_name_tag(&mut worklist, &input).unwrap();
        add_name_tag(&mut worklist, &input).unwrap();

        assert_eq!(worklist.len(), 1);
        let entry = &worklist.entries()[0];
        assert_eq!(entry.label, "Ján Novák");
        assert_eq!(entry.location, "IT");
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.barcode_payload(), "1234567890");
    }

    #[test]
    fn shelf_label_payload_joins_with_tab() {
        let mut worklist = WorklistAggregator::new();
        assert!(add_shelf_label(&mut worklist, "0501", " ").is_err());

        add_shelf_label(&mut worklist, "0501", "01-02-03").unwrap();
        let entry = &worklist.entries()[0];
        assert_eq!(entry.label, SHELF_CAPTION);
        assert_eq!(entry.barcode_payload(), "0501\t01-02-03");
    }

    #[test]
    fn shelf_labels_from_catalog_derive_fach() {
        let mut worklist = WorklistAggregator::new();
        add_quick_label(&mut worklist, "1", "keep", "me").unwrap();

        let count = add_shelf_labels_from_catalog(&mut worklist, &catalog(), true).unwrap();
        assert_eq!(count, 3);
        assert_eq!(worklist.len(), 3);

        let payloads: Vec<String> = worklist
            .entries()
            .iter()
            .map(|e| e.barcode_payload())
            .collect();
        assert_eq!(
            payloads,
            vec!["001\t00-00-00", "012\t00-00-00", "051\t00-00-00"]
        );
        assert_eq!(worklist.entries()[1].label, "Polica B12-3");
    }

    #[test]
    fn shelf_labels_keep_locations_already_in_shelf_form() {
        let mut catalog = Catalog::new();
        catalog
            .add(&ItemInput::new("1", "Motor", "051\t01-02-03"))
            .unwrap();
        catalog
            .add(&ItemInput::new("2", "Nut", "12\t01-02-03"))
            .unwrap();
        catalog
            .add(&ItemInput::new("3", "Pin", "051\t1-02-03"))
            .unwrap();

        let mut worklist = WorklistAggregator::new();
        add_shelf_labels_from_catalog(&mut worklist, &catalog, true).unwrap();

        let payloads: Vec<String> = worklist
            .entries()
            .iter()
            .map(|e| e.barcode_payload())
            .collect();
        assert_eq!(
            payloads,
            vec!["051\t01-02-03", "012\t00-00-00", "051\t00-00-00"]
        );
        assert_eq!(
            worklist.entries()[0].kind,
            LabelKind::Shelf {
                fach: "051".into(),
                shelf: "01-02-03".into()
            }
        );
        assert_eq!(worklist.entries()[0].label, "Polica 051\t01-02-03");
    }

    #[test]
    fn shelf_labels_from_empty_catalog_fail() {
        let mut worklist = WorklistAggregator::new();
        assert!(add_shelf_labels_from_catalog(&mut worklist, &Catalog::new(), false).is_err());
    }
}
