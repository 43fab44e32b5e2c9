//! Chirp publishing use-cases.
//!
//! # Invariants
//! - Bodies longer than `MAX_CHIRP_BYTES` never reach the repository.
//! - Stored bodies have every banned word replaced by `****`.

use crate::model::ids::{PostId, UserId};
use crate::model::post::Post;
use crate::repo::{DeleteOutcome, PostListQuery, PostRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum body length in UTF-8 bytes.
pub const MAX_CHIRP_BYTES: usize = 140;

const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

pub type ChirpResult<T> = Result<T, ChirpError>;

#[derive(Debug)]
pub enum ChirpError {
    TooLong { len: usize, max: usize },
    Repo(RepoError),
}

impl Display for ChirpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLong { len, max } => {
                write!(f, "chirp too long: {len} bytes exceeds limit of {max}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ChirpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TooLong { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ChirpError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case wrapper for chirp operations.
pub struct ChirpService<'repo, R: PostRepository> {
    repo: &'repo R,
}

impl<'repo, R: PostRepository> ChirpService<'repo, R> {
    pub fn new(repo: &'repo R) -> Self {
        Self { repo }
    }

    /// Validates, masks and stores a chirp for `author_id`.
    pub fn publish(&self, body: &str, author_id: UserId) -> ChirpResult<Post> {
        if body.len() > MAX_CHIRP_BYTES {
            return Err(ChirpError::TooLong {
                len: body.len(),
                max: MAX_CHIRP_BYTES,
            });
        }
        let cleaned = mask_banned_words(body);
        Ok(self.repo.create_post(&cleaned, author_id)?)
    }

    pub fn list(&self, query: &PostListQuery) -> ChirpResult<Vec<Post>> {
        Ok(self.repo.list_posts(query)?)
    }

    pub fn get(&self, id: PostId) -> ChirpResult<Option<Post>> {
        Ok(self.repo.get_post(id)?)
    }

    pub fn delete(&self, id: PostId, requester_id: UserId) -> ChirpResult<DeleteOutcome> {
        Ok(self.repo.delete_post(id, requester_id)?)
    }
}

/// Replaces banned words with `****`.
///
/// Words are split on single spaces and compared case-insensitively;
/// words with attached punctuation are left alone.
pub fn mask_banned_words(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if BANNED_WORDS.contains(&word.to_lowercase().as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
