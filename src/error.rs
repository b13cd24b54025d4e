use serde::Serialize;
use thiserror::Error;

/// Failures a user can see. None of them are fatal: every path that returns
/// one leaves the session's collections as they were before the call.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("invalid article code '{0}'")]
    InvalidArticle(String),

    #[error("invalid personal number '{0}': expected 6-15 digits")]
    InvalidPersonalNumber(String),

    #[error("invalid quantity {0}: must be at least 1")]
    InvalidQuantity(i64),

    #[error("item already exists in the database")]
    Duplicate,

    #[error("failed to save data: {0}")]
    Persistence(String),

    #[error("{0} was not found")]
    NotFound(String),

    #[error("failed to load data: {0}")]
    Import(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("print history entry {0} not found")]
    UnknownHistoryEntry(String),

    #[error("print set '{0}' not found")]
    UnknownPrintSet(String),
}

/// Coarse classification forwarded to the UI so it can pick a toast style.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Rejected,
    Duplicate,
    Persistence,
    NotFound,
    External,
}

impl LabelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LabelError::InvalidInput(_)
            | LabelError::InvalidArticle(_)
            | LabelError::InvalidPersonalNumber(_)
            | LabelError::InvalidQuantity(_) => ErrorKind::Rejected,
            LabelError::Duplicate => ErrorKind::Duplicate,
            LabelError::Persistence(_) => ErrorKind::Persistence,
            LabelError::NotFound(_)
            | LabelError::UnknownHistoryEntry(_)
            | LabelError::UnknownPrintSet(_) => ErrorKind::NotFound,
            LabelError::Import(_) | LabelError::Export(_) => ErrorKind::External,
        }
    }

    pub(crate) fn missing_fields() -> Self {
        LabelError::InvalidInput("all fields are required".into())
    }
}

pub type LabelResult<T> = std::result::Result<T, LabelError>;
