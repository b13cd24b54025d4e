//! Command surface for the front end. Each request is one [`Action`]; each
//! answer is a [`Reply`] carrying either data or a classified error, plus any
//! persistence warning the call produced.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::artikel;
use crate::error::{ErrorKind, LabelError, LabelResult};
use crate::export::ExportFormat;
use crate::models::{CatalogItem, ItemInput, LabelRequest, PrintHistoryEntry, WorklistEntry};
use crate::session::LabelSession;
use crate::settings::{SettingsPatch, UserSettings};
use crate::worklist::{generate_personal_code, NameTagInput};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    GetState,

    AddItem(ItemInput),
    RemoveItem { id: String },
    ClearCatalog,
    ImportCatalog { path: PathBuf },
    ImportCatalogCsv { text: String },
    ExportCatalog { format: ExportFormat },
    SearchCatalog { term: String },
    FormatArticle { code: String },

    AddLabel(LabelRequest),
    AddQuickLabel {
        article_code: String,
        label: String,
        location: String,
    },
    AddBulk { input: String },
    AddNameTag(NameTagInput),
    GeneratePersonalCode,
    AddShelfLabel { fach: String, shelf: String },
    AddShelfLabelsFromCatalog {
        #[serde(default)]
        replace: bool,
    },
    RemoveLabel { id: String },
    RemoveLabels { ids: Vec<String> },
    ClearWorklist,
    SetQuantity { id: String, quantity: i64 },
    SetQuantityMany { ids: Vec<String>, quantity: i64 },
    Reorder { from: usize, to: usize },
    ExportWorklist,

    Preview,
    Print,
    Reprint { history_id: String },
    ClearHistory,
    SearchHistory {
        #[serde(default)]
        term: String,
    },
    HistoryStats,
    ExportHistory,

    SavePrintSet { name: String },
    LoadPrintSet { name: String },
    DeletePrintSet { name: String },
    ListPrintSets,

    UpdateSettings(SettingsPatch),
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyError {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReplyError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Reply {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: (!data.is_null()).then_some(data),
            error: None,
            warning: None,
        }
    }

    pub fn failure(err: &LabelError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ReplyError {
                kind: err.kind(),
                message: err.to_string(),
            }),
            warning: None,
        }
    }
}

/// Everything the renderer needs to redraw.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateSnapshot<'a> {
    catalog: &'a [CatalogItem],
    worklist: &'a [WorklistEntry],
    total_labels: u64,
    history: &'a [PrintHistoryEntry],
    print_sets: Vec<&'a str>,
    settings: &'a UserSettings,
}

impl<'a> StateSnapshot<'a> {
    fn of(session: &'a LabelSession) -> Self {
        Self {
            catalog: session.catalog().items(),
            worklist: session.worklist().entries(),
            total_labels: session.worklist().total_quantity(),
            history: session.history().records(),
            print_sets: session.print_sets().names(),
            settings: session.settings(),
        }
    }
}

/// Parses one JSON request. Malformed input becomes a rejected reply.
pub fn parse_action(raw: &str) -> Result<Action, Reply> {
    serde_json::from_str(raw).map_err(|err| {
        log_warn!("rejecting malformed request: {err}");
        Reply::failure(&LabelError::InvalidInput(format!("malformed request: {err}")))
    })
}

pub fn dispatch(session: &mut LabelSession, action: Action) -> Reply {
    log_debug!("dispatch {action:?}");
    let mut reply = match execute(session, action) {
        Ok(data) => Reply::success(data),
        Err(err) => {
            log_debug!("action failed: {err}");
            Reply::failure(&err)
        }
    };
    reply.warning = session.take_persist_warning();
    reply
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> LabelResult<Value> {
    serde_json::to_value(value).map_err(|err| LabelError::Export(err.to_string()))
}

fn execute(session: &mut LabelSession, action: Action) -> LabelResult<Value> {
    match action {
        Action::GetState => to_json(&StateSnapshot::of(session)),

        Action::AddItem(input) => to_json(&session.add_item(&input)?),
        Action::RemoveItem { id } => to_json(&session.remove_item(&id)),
        Action::ClearCatalog => {
            session.clear_catalog();
            Ok(Value::Null)
        }
        Action::ImportCatalog { path } => to_json(&session.import_file(&path)?),
        Action::ImportCatalogCsv { text } => to_json(&session.import_csv(&text)?),
        Action::ExportCatalog { format } => to_json(&session.export_catalog(format)?),
        Action::SearchCatalog { term } => to_json(&session.search(&term)),
        Action::FormatArticle { code } => to_json(&artikel::format_raw(&code)),

        Action::AddLabel(request) => to_json(&session.add_label(request)?),
        Action::AddQuickLabel {
            article_code,
            label,
            location,
        } => to_json(&session.add_quick_label(&article_code, &label, &location)?),
        Action::AddBulk { input } => to_json(&session.add_bulk(&input)?),
        Action::AddNameTag(input) => to_json(&session.add_name_tag(&input)?),
        Action::GeneratePersonalCode => to_json(&generate_personal_code()),
        Action::AddShelfLabel { fach, shelf } => to_json(&session.add_shelf_label(&fach, &shelf)?),
        Action::AddShelfLabelsFromCatalog { replace } => {
            to_json(&session.add_shelf_labels_from_catalog(replace)?)
        }
        Action::RemoveLabel { id } => to_json(&session.remove_label(&id)),
        Action::RemoveLabels { ids } => to_json(&session.remove_labels(&ids)),
        Action::ClearWorklist => {
            session.clear_worklist();
            Ok(Value::Null)
        }
        Action::SetQuantity { id, quantity } => to_json(&session.set_quantity(&id, quantity)),
        Action::SetQuantityMany { ids, quantity } => {
            to_json(&session.set_quantity_many(&ids, quantity)?)
        }
        Action::Reorder { from, to } => to_json(&session.reorder(from, to)),
        Action::ExportWorklist => to_json(&session.export_worklist()?),

        Action::Preview => to_json(&session.preview()?),
        Action::Print => to_json(&session.print()?),
        Action::Reprint { history_id } => to_json(&session.reprint(&history_id)?),
        Action::ClearHistory => {
            session.clear_history();
            Ok(Value::Null)
        }
        Action::SearchHistory { term } => to_json(&session.history().search(&term)),
        Action::HistoryStats => to_json(&session.history().stats()),
        Action::ExportHistory => to_json(&session.export_history()?),

        Action::SavePrintSet { name } => {
            session.save_print_set(&name)?;
            Ok(Value::Null)
        }
        Action::LoadPrintSet { name } => to_json(&session.load_print_set(&name)?),
        Action::DeletePrintSet { name } => {
            session.delete_print_set(&name)?;
            Ok(Value::Null)
        }
        Action::ListPrintSets => to_json(&session.print_sets().names()),

        Action::UpdateSettings(patch) => to_json(session.update_settings(patch)),
        Action::ToggleTheme => to_json(session.toggle_theme()),
    }
}
