//! Store configuration.
//!
//! # Responsibility
//! - Describe where the store lives and how it writes and numbers records.
//!
//! # Invariants
//! - Defaults favor crash safety (`durable_writes`) and live-id safety
//!   (`IdAssignment::NextAfterMax`).

use std::path::{Path, PathBuf};

/// How new post and user ids are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdAssignment {
    /// `max(existing id) + 1`. Never collides with a live record.
    #[default]
    NextAfterMax,
    /// `count + 1`. Matches files written by the legacy service, but can
    /// hand out a live id after a deletion.
    CollectionSize,
}

/// Options for opening a [`crate::repo::JsonRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub id_assignment: IdAssignment,
    /// Write through a synced temp file plus rename instead of in place.
    pub durable_writes: bool,
    /// Delete any existing store file before opening.
    pub reset_on_open: bool,
}

impl StoreConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            id_assignment: IdAssignment::default(),
            durable_writes: true,
            reset_on_open: false,
        }
    }

    pub fn with_id_assignment(mut self, id_assignment: IdAssignment) -> Self {
        self.id_assignment = id_assignment;
        self
    }

    pub fn with_durable_writes(mut self, durable_writes: bool) -> Self {
        self.durable_writes = durable_writes;
        self
    }

    pub fn with_reset_on_open(mut self, reset_on_open: bool) -> Self {
        self.reset_on_open = reset_on_open;
        self
    }
}
