//! Chirp record.

use crate::model::ids::{PostId, UserId};
use serde::{Deserialize, Serialize};

/// A short text post authored by one user.
///
/// Immutable after creation; removed only by an owner-checked delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Post {
    pub id: PostId,
    /// Already validated and filtered by the caller.
    pub body: String,
    /// Author at creation time. Not checked against `users`.
    pub author_id: UserId,
}

impl Post {
    pub fn new(id: PostId, body: impl Into<String>, author_id: UserId) -> Self {
        Self {
            id,
            body: body.into(),
            author_id,
        }
    }

    /// Returns whether `requester` may delete this post.
    pub fn is_owned_by(&self, requester: UserId) -> bool {
        self.author_id == requester
    }
}
