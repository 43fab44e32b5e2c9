//! Repository contracts and the JSON-file implementation.
//!
//! # Responsibility
//! - Expose the complete store API as three use-case traits.
//! - Serialize every load-mutate-persist cycle behind one lock.
//! - Return semantic outcomes (`NotFound`, `Forbidden`, `AuthFailed`) in
//!   addition to storage failures.
//!
//! # Invariants
//! - Writers exclude all readers and writers for the whole cycle.
//! - A refused or failed operation leaves the file untouched.

use crate::model::ids::{PostId, UserId};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod json_repo;
mod post_repo;
mod token_repo;
mod user_repo;

pub use json_repo::{JsonRepository, StoreSummary};
pub use post_repo::{DeleteOutcome, PostListQuery, PostRepository, SortOrder};
pub use token_repo::RevocationRepository;
pub use user_repo::UserRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Record addressed by a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    Post(PostId),
    User(UserId),
}

/// Error taxonomy callers map onto transport responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StorageUnavailable,
    CorruptDocument,
    NotFound,
    Forbidden,
    AuthFailed,
}

#[derive(Debug)]
pub enum RepoError {
    Storage(StoreError),
    NotFound(RecordRef),
    Forbidden {
        post_id: PostId,
        requester_id: UserId,
    },
    /// Unknown email or rejected credentials; deliberately indistinguishable.
    AuthFailed,
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(StoreError::Unavailable { .. }) => ErrorKind::StorageUnavailable,
            Self::Storage(StoreError::Corrupt { .. }) => ErrorKind::CorruptDocument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::AuthFailed => ErrorKind::AuthFailed,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::NotFound(RecordRef::Post(id)) => write!(f, "chirp not found: {id}"),
            Self::NotFound(RecordRef::User(id)) => write!(f, "user not found: {id}"),
            Self::Forbidden {
                post_id,
                requester_id,
            } => write!(f, "user {requester_id} does not own chirp {post_id}"),
            Self::AuthFailed => write!(f, "invalid credentials"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NotFound(_) | Self::Forbidden { .. } | Self::AuthFailed => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}
