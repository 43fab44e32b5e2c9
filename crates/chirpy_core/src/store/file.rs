//! File I/O for the store document.
//!
//! # Invariants
//! - Durable persists never leave a half-written target file: bytes go to
//!   a synced sibling temp file that is renamed over the target.
//! - A durable persist keeps the permissions of an existing target file.
//! - Log events carry paths, sizes and durations only.

use super::{StoreError, StoreResult};
use crate::model::document::Document;
use log::{debug, error, info};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tempfile::NamedTempFile;

/// Makes sure a readable document exists at `path`.
///
/// Writes an empty document when the file is missing. Any other load
/// failure, including a corrupt file, is returned unchanged.
pub fn ensure_document(path: &Path, durable: bool) -> StoreResult<()> {
    match load_document(path) {
        Ok(_) => Ok(()),
        Err(err) if err.is_missing_file() => {
            info!(
                "event=store_create module=store status=start path={}",
                path.display()
            );
            persist_document(path, &Document::default(), durable)
        }
        Err(err) => Err(err),
    }
}

/// Reads and decodes the full document.
pub fn load_document(path: &Path) -> StoreResult<Document> {
    let started_at = Instant::now();

    let bytes = fs::read(path).map_err(|source| {
        // A missing file is routine during bootstrap.
        if source.kind() != io::ErrorKind::NotFound {
            error!(
                "event=store_load module=store status=error path={} error_code=read_failed error={}",
                path.display(),
                source
            );
        }
        StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let document = decode(&bytes).map_err(|reason| {
        error!(
            "event=store_load module=store status=error path={} error_code=corrupt_document error={}",
            path.display(),
            reason
        );
        StoreError::Corrupt {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    debug!(
        "event=store_load module=store status=ok bytes={} duration_ms={}",
        bytes.len(),
        started_at.elapsed().as_millis()
    );
    Ok(document)
}

/// Encodes and writes the full document, replacing the previous contents.
pub fn persist_document(path: &Path, document: &Document, durable: bool) -> StoreResult<()> {
    let started_at = Instant::now();

    let bytes = serde_json::to_vec(document).map_err(|err| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: format!("failed to encode document: {err}"),
    })?;

    let written = if durable {
        write_replacing(path, &bytes)
    } else {
        fs::write(path, &bytes)
    };

    match written {
        Ok(()) => {
            debug!(
                "event=store_persist module=store status=ok durable={} bytes={} duration_ms={}",
                durable,
                bytes.len(),
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(source) => {
            error!(
                "event=store_persist module=store status=error path={} durable={} duration_ms={} error={}",
                path.display(),
                durable,
                started_at.elapsed().as_millis(),
                source
            );
            Err(StoreError::Unavailable {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Deletes the store file. A missing file is not an error.
pub fn remove_document(path: &Path) -> StoreResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(
                "event=store_reset module=store status=ok path={}",
                path.display()
            );
            Ok(())
        }
        Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn decode(bytes: &[u8]) -> Result<Document, String> {
    let document: Document = serde_json::from_slice(bytes).map_err(|err| err.to_string())?;
    document.validate().map_err(|err| err.to_string())?;
    Ok(document)
}

fn write_replacing(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    // Temp files start owner-only; the rename must not tighten the target.
    match fs::metadata(path) {
        Ok(existing) => staged.as_file().set_permissions(existing.permissions())?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}
