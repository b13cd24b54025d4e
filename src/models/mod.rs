pub mod history;
pub mod item;
pub mod label;

pub use history::PrintHistoryEntry;
pub use item::{CatalogItem, ItemInput};
pub use label::{LabelKind, LabelRequest, WorklistEntry, SHELF_CAPTION};
