//! Flat-file JSON persistence.
//!
//! Reads and writes whole JSON documents. The `*_or_*` helpers never fail:
//! problems are logged under the caller's span and a safe default is used.

use std::io;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{Span, debug, error, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    /// The file could not be read, created or written.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file content is not the expected JSON document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

/// Read and decode the JSON document at `path`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Encode `value` and replace the file at `path` with it (truncate + write).
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json.as_bytes())?;
    Ok(())
}

/// Load `path`, substituting `T::default()` on any failure.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path, span: &Span) -> T {
    match read_json(path) {
        Ok(value) => {
            debug!(parent: span, path = %path.display(), "loaded");
            value
        }
        Err(e) if e.is_not_found() => {
            debug!(parent: span, path = %path.display(), "no file yet, starting empty");
            T::default()
        }
        Err(e) => {
            warn!(parent: span, path = %path.display(), error = %e, "failed to load, starting empty");
            T::default()
        }
    }
}

/// Save `value` to `path`; errors are logged and reported as `false`.
pub fn save_or_log<T: Serialize + ?Sized>(path: &Path, value: &T, span: &Span) -> bool {
    match write_json(path, value) {
        Ok(()) => {
            debug!(parent: span, path = %path.display(), "saved");
            true
        }
        Err(e) => {
            error!(parent: span, path = %path.display(), error = %e, "failed to save");
            false
        }
    }
}
