use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::ensure_dir,
    errors::LedgerError,
    ledger::{LedgerState, CURRENT_SCHEMA_VERSION},
};

use super::{document::LedgerDocument, LoadReport, Result, StorageBackend};

pub const DEFAULT_DATA_FILE: &str = "finance_data.json";
const TMP_SUFFIX: &str = "tmp";

/// Single-file JSON persistence for the tracker state.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<LoadReport> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no state file, using defaults");
            return Ok(LoadReport::new(LedgerState::default(), Vec::new(), true));
        }
        let state = load_state_from_path(&self.path)?;
        tracing::debug!(path = %self.path.display(), "loaded state file");
        Ok(state)
    }

    fn save(&self, state: &LedgerState) -> Result<()> {
        save_state_to_path(state, &self.path)?;
        tracing::debug!(path = %self.path.display(), "saved state file");
        Ok(())
    }

    fn location(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}

/// Writes the state to `path` by staging a temporary file and renaming it into place.
pub fn save_state_to_path(state: &LedgerState, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(&LedgerDocument::from_state(state))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a state snapshot from `path`, applying upgrades for older layouts.
pub fn load_state_from_path(path: &Path) -> Result<LoadReport> {
    let data = fs::read_to_string(path)?;
    let document: LedgerDocument =
        serde_json::from_str(&data).map_err(|err| LedgerError::CorruptState {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    if document.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(LedgerError::Persistence(format!(
            "state schema v{} is newer than supported v{}",
            document.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    let (state, migrations) = document.into_state();
    Ok(LoadReport::new(state, migrations, false))
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
