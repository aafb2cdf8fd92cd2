//! Variable-library document I/O.
//!
//! The document is read in full and written in full; there is no partial
//! update. A missing file reads as an empty library so first runs and
//! steady-state runs share one code path.

use std::path::Path;

use weft_core::types::VariableLibrary;

use crate::error::{io_err, SyncError};

/// Load the library at `path`, or an empty one if the file does not exist.
pub fn load_at(path: &Path) -> Result<VariableLibrary, SyncError> {
    if !path.exists() {
        return Ok(VariableLibrary::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&contents).map_err(|source| SyncError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize the library the way it is persisted: pretty-printed, trailing
/// newline.
pub fn render(library: &VariableLibrary) -> Result<String, SyncError> {
    let mut json = serde_json::to_string_pretty(library)?;
    json.push('\n');
    Ok(json)
}
