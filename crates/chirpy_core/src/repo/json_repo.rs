//! JSON-document repository.
//!
//! # Responsibility
//! - Bind one store file to one process-wide lock.
//! - Run each operation as a full load-mutate-persist cycle under it.
//!
//! # Invariants
//! - Reads hold the shared lock, writes hold the exclusive lock, both from
//!   before the load until after the persist.
//! - No document outlives a single operation; there is no cache.
//! - Share one instance (e.g. behind `Arc`) per store file; separate
//!   instances on the same path do not exclude each other.

use super::{RepoError, RepoResult};
use crate::config::{IdAssignment, StoreConfig};
use crate::model::document::{Document, DocumentValidationError};
use crate::store::{
    ensure_document, load_document, persist_document, remove_document, StoreError,
};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::Instant;

/// Record counts of the current document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub posts: usize,
    pub users: usize,
    pub revoked_tokens: usize,
}

/// Result of a write closure: whether the document must be written back.
pub(crate) enum Change<T> {
    Persist(T),
    Keep(T),
}

/// Repository over a single JSON file.
#[derive(Debug)]
pub struct JsonRepository {
    path: PathBuf,
    id_assignment: IdAssignment,
    durable_writes: bool,
    // Guards the file, not in-memory data, so poisoning carries no torn state.
    lock: RwLock<()>,
}

impl JsonRepository {
    /// Opens the store, creating an empty document when none exists.
    ///
    /// # Errors
    /// - `StorageUnavailable` when the file exists but cannot be read, or a
    ///   new file cannot be written.
    /// - `CorruptDocument` when an existing file does not decode.
    ///
    /// Callers should treat any error here as fatal for the process.
    pub fn open(config: &StoreConfig) -> RepoResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=repo_open module=repo status=start path={} reset={}",
            config.path.display(),
            config.reset_on_open
        );

        if config.reset_on_open {
            remove_document(&config.path)?;
        }
        ensure_document(&config.path, config.durable_writes)?;

        info!(
            "event=repo_open module=repo status=ok id_assignment={:?} durable_writes={} duration_ms={}",
            config.id_assignment,
            config.durable_writes,
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            path: config.path.clone(),
            id_assignment: config.id_assignment,
            durable_writes: config.durable_writes,
            lock: RwLock::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counts records in the current document.
    pub fn summary(&self) -> RepoResult<StoreSummary> {
        self.read(|doc| {
            Ok(StoreSummary {
                posts: doc.chirps.len(),
                users: doc.users.len(),
                revoked_tokens: doc.revoked_tokens.len(),
            })
        })
    }

    pub(crate) fn id_assignment(&self) -> IdAssignment {
        self.id_assignment
    }

    /// Reports a loaded document that cannot accept the requested change.
    pub(crate) fn unusable_document(&self, err: DocumentValidationError) -> RepoError {
        error!(
            "event=repo_write module=repo status=error path={} error_code=unusable_document error={}",
            self.path.display(),
            err
        );
        RepoError::Storage(StoreError::Corrupt {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }

    /// Runs `op` against a freshly loaded document under the shared lock.
    pub(crate) fn read<T>(&self, op: impl FnOnce(&Document) -> RepoResult<T>) -> RepoResult<T> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        let document = load_document(&self.path)?;
        op(&document)
    }

    /// Runs `op` against a freshly loaded document under the exclusive lock
    /// and persists it when `op` reports a change.
    pub(crate) fn write<T>(
        &self,
        op: impl FnOnce(&mut Document) -> RepoResult<Change<T>>,
    ) -> RepoResult<T> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut document = load_document(&self.path)?;
        match op(&mut document)? {
            Change::Persist(value) => {
                persist_document(&self.path, &document, self.durable_writes)?;
                Ok(value)
            }
            Change::Keep(value) => Ok(value),
        }
    }
}
