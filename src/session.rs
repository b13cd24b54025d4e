use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::artikel;
use crate::catalog::Catalog;
use crate::error::{LabelError, LabelResult};
use crate::export::{self, ExportFormat, ExportedFile};
use crate::import::{self, ImportedRows};
use crate::models::{CatalogItem, ItemInput, LabelRequest, PrintHistoryEntry, WorklistEntry};
use crate::print::{self, PrintHistory, PrintSets, PrintUnit};
use crate::settings::{SettingsPatch, UserSettings};
use crate::storage::{self, keys, LocalStore};
use crate::worklist::{intake, BulkReport, NameTagInput, WorklistAggregator};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    pub history_id: String,
    pub total_labels: u64,
    pub units: Vec<PrintUnit>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub loaded: usize,
    pub rejected: usize,
}

/// Everything one user works with: catalog, worklist, print history, print
/// sets and settings, plus the store they are written to.
///
/// Every mutating call rewrites the affected collections. A failed write is
/// logged and kept as a warning for the caller; the in-memory state stays
/// as the call left it.
pub struct LabelSession {
    store: Box<dyn LocalStore>,
    catalog: Catalog,
    worklist: WorklistAggregator,
    history: PrintHistory,
    print_sets: PrintSets,
    settings: UserSettings,
    persist_warning: Option<String>,
}

impl LabelSession {
    /// Restores every collection from `store`. Absent or unreadable keys start
    /// empty.
    pub fn load(store: Box<dyn LocalStore>) -> Self {
        let catalog: Catalog = storage::load_json(store.as_ref(), keys::DATABASE);
        let worklist = WorklistAggregator::from_entries(storage::load_json(
            store.as_ref(),
            keys::WORKLIST,
        ));
        let history = PrintHistory::from_records(storage::load_json(store.as_ref(), keys::HISTORY));
        let print_sets: PrintSets = storage::load_json(store.as_ref(), keys::PRINT_SETS);
        let settings = UserSettings::load(store.as_ref());

        log_info!(
            "Session loaded: {} catalog items, {} queued labels, {} history records, {} print sets",
            catalog.len(),
            worklist.len(),
            history.len(),
            print_sets.names().len()
        );

        Self {
            store,
            catalog,
            worklist,
            history,
            print_sets,
            settings,
            persist_warning: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn worklist(&self) -> &WorklistAggregator {
        &self.worklist
    }

    pub fn history(&self) -> &PrintHistory {
        &self.history
    }

    pub fn print_sets(&self) -> &PrintSets {
        &self.print_sets
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Warning left by the last failed write, cleared on read.
    pub fn take_persist_warning(&mut self) -> Option<String> {
        self.persist_warning.take()
    }

    fn persist(&mut self, targets: &[&str]) {
        for key in targets {
            let result = match *key {
                keys::DATABASE => storage::save_json(self.store.as_mut(), key, &self.catalog),
                keys::WORKLIST => storage::save_json(self.store.as_mut(), key, &self.worklist),
                keys::HISTORY => storage::save_json(self.store.as_mut(), key, &self.history),
                keys::PRINT_SETS => storage::save_json(self.store.as_mut(), key, &self.print_sets),
                keys::SETTINGS => storage::save_json(self.store.as_mut(), key, &self.settings),
                other => {
                    log_warn!("persist called with unknown key {other}");
                    continue;
                }
            };

            if let Err(err) = result {
                log_error!("Failed to persist {key}: {err:#}");
                self.persist_warning =
                    Some(LabelError::Persistence(format!("{err:#}")).to_string());
            }
        }
    }

    // Catalog

    pub fn add_item(&mut self, input: &ItemInput) -> LabelResult<CatalogItem> {
        let item = self.catalog.add(input)?.clone();
        self.persist(&[keys::DATABASE]);
        Ok(item)
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        let removed = self.catalog.remove(id);
        if removed {
            self.persist(&[keys::DATABASE]);
        }
        removed
    }

    pub fn clear_catalog(&mut self) {
        self.catalog.clear();
        self.persist(&[keys::DATABASE]);
    }

    /// Replaces the catalog with imported rows.
    pub fn import_rows(&mut self, imported: ImportedRows) -> ImportSummary {
        let rejected = imported.rejected;
        let loaded = self.catalog.replace_all(imported.rows);
        self.persist(&[keys::DATABASE]);
        log_info!("Catalog replaced: {loaded} items loaded, {rejected} rows rejected");
        ImportSummary { loaded, rejected }
    }

    /// Imports a CSV file. On failure the current catalog is kept.
    pub fn import_file(&mut self, path: &Path) -> LabelResult<ImportSummary> {
        let imported = import::read_file(path).map_err(|err| {
            log_error!("Import from {} failed: {err}", path.display());
            err
        })?;
        Ok(self.import_rows(imported))
    }

    pub fn import_csv(&mut self, text: &str) -> LabelResult<ImportSummary> {
        let imported = import::parse_rows(text)?;
        Ok(self.import_rows(imported))
    }

    pub fn search(&self, term: &str) -> Vec<CatalogItem> {
        self.catalog.search(term).into_iter().cloned().collect()
    }

    pub fn export_catalog(&self, format: ExportFormat) -> LabelResult<ExportedFile> {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        export::export_catalog(&self.catalog, format, &date)
    }

    pub fn export_history(&self) -> LabelResult<ExportedFile> {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        export::export_history(&self.history, &date)
    }

    pub fn export_worklist(&self) -> LabelResult<String> {
        export::export_worklist(self.worklist.entries())
            .map_err(|err| LabelError::Export(format!("{err:#}")))
    }

    // Worklist

    /// Queues a label picked from the catalog or search results.
    pub fn add_label(&mut self, request: LabelRequest) -> LabelResult<String> {
        if !artikel::is_valid(&request.article_code) {
            return Err(LabelError::InvalidArticle(request.article_code));
        }
        let id = self.worklist.add_or_merge(request);
        self.persist(&[keys::WORKLIST]);
        Ok(id)
    }

    pub fn add_quick_label(
        &mut self,
        article_code: &str,
        label: &str,
        location: &str,
    ) -> LabelResult<String> {
        let id = intake::add_quick_label(&mut self.worklist, article_code, label, location)?;
        self.persist(&[keys::WORKLIST]);
        Ok(id)
    }

    pub fn add_bulk(&mut self, input: &str) -> LabelResult<BulkReport> {
        let report = intake::add_bulk(&mut self.worklist, &self.catalog, input)?;
        self.persist(&[keys::WORKLIST]);
        Ok(report)
    }

    pub fn add_name_tag(&mut self, input: &NameTagInput) -> LabelResult<String> {
        let id = intake::add_name_tag(&mut self.worklist, input)?;
        self.persist(&[keys::WORKLIST]);
        Ok(id)
    }

    pub fn add_shelf_label(&mut self, fach: &str, shelf: &str) -> LabelResult<String> {
        let id = intake::add_shelf_label(&mut self.worklist, fach, shelf)?;
        self.persist(&[keys::WORKLIST]);
        Ok(id)
    }

    pub fn add_shelf_labels_from_catalog(&mut self, replace: bool) -> LabelResult<usize> {
        let count =
            intake::add_shelf_labels_from_catalog(&mut self.worklist, &self.catalog, replace)?;
        self.persist(&[keys::WORKLIST]);
        Ok(count)
    }

    pub fn remove_label(&mut self, id: &str) -> bool {
        let removed = self.worklist.remove(id);
        self.persist(&[keys::WORKLIST]);
        removed
    }

    pub fn remove_labels(&mut self, ids: &[String]) -> usize {
        let removed = self.worklist.remove_many(ids);
        self.persist(&[keys::WORKLIST]);
        removed
    }

    pub fn clear_worklist(&mut self) {
        self.worklist.clear();
        self.persist(&[keys::WORKLIST]);
    }

    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> bool {
        let changed = self.worklist.set_quantity(id, quantity);
        self.persist(&[keys::WORKLIST]);
        changed
    }

    pub fn set_quantity_many(&mut self, ids: &[String], quantity: i64) -> LabelResult<usize> {
        if ids.is_empty() {
            return Err(LabelError::InvalidInput("no labels selected".into()));
        }
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(LabelError::InvalidQuantity(quantity))?;
        let updated = self.worklist.set_quantity_many(ids, quantity);
        self.persist(&[keys::WORKLIST]);
        Ok(updated)
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let moved = self.worklist.reorder(from, to);
        if moved {
            self.persist(&[keys::WORKLIST]);
        }
        moved
    }

    // Printing

    pub fn preview(&self) -> LabelResult<Vec<PrintUnit>> {
        if self.worklist.is_empty() {
            return Err(LabelError::InvalidInput("no labels to print".into()));
        }
        Ok(print::expand(self.worklist.entries(), &self.settings))
    }

    /// Records the print in history and returns the units to hand to the
    /// printer. The worklist itself is left as it is.
    pub fn print(&mut self) -> LabelResult<PrintJob> {
        let units = self.preview()?;
        let record = self
            .history
            .record(self.worklist.entries(), self.settings.current_template);
        let job = PrintJob {
            history_id: record.id.clone(),
            total_labels: record.total_labels,
            units,
        };
        self.persist(&[keys::HISTORY]);
        log_info!("Printing {} labels", job.total_labels);
        Ok(job)
    }

    /// Puts a past print back on the worklist under fresh ids and restores
    /// its template.
    pub fn reprint(&mut self, history_id: &str) -> LabelResult<PrintHistoryEntry> {
        let record = self
            .history
            .find(history_id)
            .cloned()
            .ok_or_else(|| LabelError::UnknownHistoryEntry(history_id.to_string()))?;
        self.worklist.replace_with(&record.entries);
        self.settings.current_template = record.template;
        self.persist(&[keys::WORKLIST, keys::SETTINGS]);
        Ok(record)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist(&[keys::HISTORY]);
    }

    // Print sets

    pub fn save_print_set(&mut self, name: &str) -> LabelResult<()> {
        self.print_sets.save(name, self.worklist.entries())?;
        self.persist(&[keys::PRINT_SETS]);
        Ok(())
    }

    /// Replaces the worklist with the named set. Returns the number of
    /// entries loaded.
    pub fn load_print_set(&mut self, name: &str) -> LabelResult<usize> {
        let entries: Vec<WorklistEntry> = self.print_sets.load(name)?;
        self.worklist = WorklistAggregator::from_entries(entries);
        self.persist(&[keys::WORKLIST]);
        Ok(self.worklist.len())
    }

    pub fn delete_print_set(&mut self, name: &str) -> LabelResult<()> {
        self.print_sets.delete(name)?;
        self.persist(&[keys::PRINT_SETS]);
        Ok(())
    }

    // Settings

    pub fn update_settings(&mut self, patch: SettingsPatch) -> &UserSettings {
        self.settings.apply(patch);
        self.persist(&[keys::SETTINGS]);
        &self.settings
    }

    pub fn toggle_theme(&mut self) -> &UserSettings {
        self.settings.toggle_theme();
        self.persist(&[keys::SETTINGS]);
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session() -> LabelSession {
        LabelSession::load(Box::new(MemoryStore::new()))
    }

    #[test]
    fn print_records_pre_print_total() {
        let mut session = session();
        session
            .add_label(LabelRequest::standard("123-456", "Bolt", "A1").with_quantity(2))
            .unwrap();
        session.add_quick_label("9", "Nut", "B").unwrap();
        let expected = session.worklist().total_quantity();

        let job = session.print().unwrap();
        assert_eq!(job.total_labels, expected);
        assert_eq!(job.units.len() as u64, expected);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().records()[0].total_labels, expected);
    }

    #[test]
    fn printing_empty_worklist_is_rejected() {
        let mut session = session();
        assert!(matches!(session.print(), Err(LabelError::InvalidInput(_))));
        assert!(session.history().is_empty());
    }

    #[test]
    fn history_keeps_last_hundred_prints() {
        let mut session = session();
        session.add_quick_label("1", "a", "b").unwrap();
        let first = session.print().unwrap().history_id;
        for _ in 0..100 {
            session.print().unwrap();
        }
        assert_eq!(session.history().len(), 100);
        assert!(session.history().find(&first).is_none());
    }

    #[test]
    fn print_set_round_trip_uses_fresh_ids() {
        let mut session = session();
        session.add_quick_label("123", "Bolt", "A1").unwrap();
        session.add_shelf_label("0501", "01-01-01").unwrap();
        let original: Vec<WorklistEntry> = session.worklist().entries().to_vec();

        session.save_print_set("monday").unwrap();
        session.clear_worklist();
        assert_eq!(session.load_print_set("monday").unwrap(), 2);

        for (loaded, source) in session.worklist().entries().iter().zip(&original) {
            assert_ne!(loaded.id, source.id);
            assert_eq!(loaded.key(), source.key());
            assert_eq!(loaded.quantity, source.quantity);
            assert_eq!(loaded.kind, source.kind);
        }
    }

    #[test]
    fn reprint_restores_entries_and_template() {
        let mut session = session();
        session.update_settings(SettingsPatch {
            current_template: Some(crate::settings::LabelTemplate::Compact),
            ..SettingsPatch::default()
        });
        session.add_quick_label("123", "Bolt", "A1").unwrap();
        let job = session.print().unwrap();

        session.clear_worklist();
        session.update_settings(SettingsPatch {
            current_template: Some(crate::settings::LabelTemplate::Default),
            ..SettingsPatch::default()
        });

        let record = session.reprint(&job.history_id).unwrap();
        assert_eq!(session.worklist().len(), 1);
        assert_ne!(session.worklist().entries()[0].id, record.entries[0].id);
        assert_eq!(
            session.settings().current_template,
            crate::settings::LabelTemplate::Compact
        );
        assert!(matches!(
            session.reprint("missing"),
            Err(LabelError::UnknownHistoryEntry(_))
        ));
    }

    #[test]
    fn bulk_quantity_rejects_values_below_one() {
        let mut session = session();
        let id = session.add_quick_label("1", "a", "b").unwrap();
        assert!(matches!(
            session.set_quantity_many(&[id.clone()], 0),
            Err(LabelError::InvalidQuantity(0))
        ));
        assert_eq!(session.set_quantity_many(&[id.clone()], 5).unwrap(), 1);
        assert_eq!(session.worklist().get(&id).map(|e| e.quantity), Some(5));
    }

    #[test]
    fn state_survives_reload_from_same_store() {
        let mut session = session();
        session.add_item(&ItemInput::new("111", "Bolt", "A1")).unwrap();
        session.add_quick_label("111", "Bolt", "A1").unwrap();
        session.toggle_theme();

        let store = session.store;
        assert!(store.get(keys::DATABASE).unwrap().is_some());
        assert!(store.get(keys::WORKLIST).unwrap().is_some());

        let session = LabelSession::load(store);
        assert_eq!(session.settings().theme, crate::settings::Theme::Dark);
        assert_eq!(session.catalog().len(), 1);
        assert_eq!(session.worklist().len(), 1);
        assert_eq!(session.worklist().entries()[0].article_code.as_str(), "111");
    }

    #[test]
    fn failed_write_keeps_memory_state_and_warns() {
        let mut session = LabelSession::load(Box::new(MemoryStore::with_quota(8)));
        let id = session.add_quick_label("123-456", "Bolt", "A1").unwrap();

        assert_eq!(session.worklist().len(), 1);
        assert_eq!(session.worklist().get(&id).map(|e| e.quantity), Some(1));
        let warning = session.take_persist_warning().unwrap();
        assert!(warning.contains("quota"));
        assert!(session.take_persist_warning().is_none());
    }

    #[test]
    fn duplicate_catalog_item_leaves_state_alone() {
        let mut session = session();
        session.add_item(&ItemInput::new("1", "a", "b")).unwrap();
        assert!(matches!(
            session.add_item(&ItemInput::new("1", "a", "b")),
            Err(LabelError::Duplicate)
        ));
        assert_eq!(session.catalog().len(), 1);
    }

    #[test]
    fn failed_import_keeps_catalog() {
        let mut session = session();
        session.add_item(&ItemInput::new("1", "a", "b")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = session.import_file(&dir.path().join("missing.csv"));
        assert!(matches!(result, Err(LabelError::NotFound(_))));
        assert_eq!(session.catalog().len(), 1);
    }

    #[test]
    fn import_replaces_catalog() {
        let mut session = session();
        session.add_item(&ItemInput::new("1", "a", "b")).unwrap();
        let summary = session
            .import_csv("Artikel,Nazov,Polica\n222-333,Nut,C1\n,x,y\n")
            .unwrap();
        assert_eq!(summary.loaded, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(session.catalog().items()[0].article_code.as_str(), "222333");
    }
}
