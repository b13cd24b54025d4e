pub mod artikel;
pub mod catalog;
pub mod commands;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod print;
pub mod session;
pub mod settings;
pub mod storage;
pub mod utils;
pub mod worklist;

use std::{
    env,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use log::{error, info, warn};

use commands::{dispatch, parse_action};
use error::LabelError;
use session::LabelSession;
use storage::SqliteStore;

pub use error::{ErrorKind, LabelResult};

const DATA_DIR_VAR: &str = "LABELPRINT_DATA_DIR";
const CATALOG_VAR: &str = "LABELPRINT_CATALOG";
const DEFAULT_DATA_DIR: &str = "./labelprint-data";

/// Start-up settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    /// CSV imported on start-up when the catalog is empty.
    pub seed_catalog: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            data_dir: non_empty(DATA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            seed_catalog: non_empty(CATALOG_VAR).map(PathBuf::from),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("labelprint.sqlite3")
    }
}

/// Opens the session stored under `config.data_dir`, seeding the catalog
/// when it is empty and a seed file is configured.
pub fn open_session(config: &RuntimeConfig) -> Result<LabelSession> {
    let store = SqliteStore::open(config.database_path())?;
    let mut session = LabelSession::load(Box::new(store));

    if let Some(path) = &config.seed_catalog {
        if session.catalog().is_empty() {
            match session.import_file(path) {
                Ok(summary) => info!(
                    "Seeded catalog from {}: {} items",
                    path.display(),
                    summary.loaded
                ),
                Err(LabelError::NotFound(_)) => {
                    warn!("Catalog file {} not found; starting empty", path.display())
                }
                Err(err) => error!("Failed to load catalog from {}: {err}", path.display()),
            }
        }
    }

    Ok(session)
}

/// Serves one JSON request per input line, answering with one JSON reply
/// per output line, until input ends.
pub fn serve<R: BufRead, W: Write>(
    session: &mut LabelSession,
    input: R,
    mut output: W,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = match parse_action(&line) {
            Ok(action) => dispatch(session, action),
            Err(reply) => reply,
        };
        let encoded = serde_json::to_string(&reply).context("failed to encode reply")?;
        writeln!(output, "{encoded}").context("failed to write reply")?;
        output.flush().context("failed to flush reply")?;
    }
    Ok(())
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("labelprint starting up...");

    let config = RuntimeConfig::from_env();
    let mut session = open_session(&config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(&mut session, stdin.lock(), stdout.lock())?;

    info!("Input closed, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn config_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.seed_catalog, None);
        assert!(config.database_path().ends_with("labelprint.sqlite3"));
    }

    #[test]
    fn config_reads_overrides_and_ignores_blank_values() {
        let config = config_from(&[(DATA_DIR_VAR, "/srv/labels"), (CATALOG_VAR, "  ")]);
        assert_eq!(config.data_dir, PathBuf::from("/srv/labels"));
        assert_eq!(config.seed_catalog, None);
    }

    #[test]
    fn serve_answers_each_line() {
        let mut session = LabelSession::load(Box::new(storage::MemoryStore::new()));
        let input = "{\"action\":\"addShelfLabel\",\"fach\":\"0501\",\"shelf\":\"01-01-01\"}\n\
                     \n\
                     garbage\n";
        let mut output = Vec::new();
        serve(&mut session, input.as_bytes(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let replies: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["ok"], true);
        assert_eq!(replies[1]["ok"], false);
        assert_eq!(replies[1]["error"]["kind"], "rejected");
    }
}
