//! Single-file JSON storage round-trip.
//!
//! # Responsibility
//! - Create, read and rewrite the store document at one path.
//! - Classify failures as unreadable/unwritable storage vs. corrupt bytes.
//!
//! # Invariants
//! - Every load parses and validates the full document; there is no cache.
//! - Every persist rewrites the full document.
//! - This layer holds no lock; callers serialize access.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod file;

pub use file::{ensure_document, load_document, persist_document, remove_document};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// The file could not be read or written.
    Unavailable { path: PathBuf, source: io::Error },
    /// The bytes do not decode into a valid document.
    Corrupt { path: PathBuf, reason: String },
}

impl StoreError {
    /// Returns whether the failure was a missing store file.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Unavailable { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { path, source } => {
                write!(f, "store `{}` unavailable: {source}", path.display())
            }
            Self::Corrupt { path, reason } => {
                write!(f, "store `{}` is corrupt: {reason}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable { source, .. } => Some(source),
            Self::Corrupt { .. } => None,
        }
    }
}
