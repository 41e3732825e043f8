//! Reading and atomically replacing the catalog file.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

use bcdb_core::CatalogDocument;

use crate::StoreError;

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Reads the catalog at `path`.
///
/// Returns `Ok(None)` when the file does not exist yet.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file exists but cannot be read and
/// [`StoreError::Parse`] if it is not a catalog document.
pub fn load_document(path: &Path) -> Result<Option<CatalogDocument>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, e)),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.display().to_string(),
            source,
        })
}

/// Writes `document` to `path`, replacing any existing file.
///
/// The document is written to a sibling temp file and renamed into place, so
/// readers never observe a half-written catalog.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] if encoding fails and [`StoreError::Io`]
/// if any filesystem step fails.
pub fn save_document(path: &Path, document: &CatalogDocument) -> Result<(), StoreError> {
    let encoded = serde_json::to_vec_pretty(document).map_err(StoreError::Serialize)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = File::create(&temp_path).map_err(|e| io_error(&temp_path, e))?;
    file.write_all(&encoded)
        .and_then(|()| file.sync_all())
        .map_err(|e| io_error(&temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| io_error(path, e))?;

    tracing::debug!(
        path = %path.display(),
        items = document.items.len(),
        "catalog written"
    );
    Ok(())
}
