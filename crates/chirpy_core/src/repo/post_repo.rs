//! Chirp persistence operations.
//!
//! # Invariants
//! - Listing is a linear scan ordered by id; ids are unique so the order
//!   is total.
//! - Delete checks ownership inside the exclusive section, so a caller bug
//!   cannot remove another user's chirp.

use super::json_repo::{Change, JsonRepository};
use super::{RepoError, RepoResult};
use crate::model::ids::{PostId, UserId};
use crate::model::post::Post;
use log::{info, warn};

/// Listing direction by post id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses a `sort` query value. Only `desc` selects descending order;
    /// anything else, including absence, is ascending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(raw) if raw.trim().eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Query options for listing chirps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostListQuery {
    /// Restrict to one author; `None` lists every chirp.
    pub author_id: Option<UserId>,
    pub order: SortOrder,
}

/// Successful delete outcomes. Ownership refusal is `RepoError::Forbidden`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The chirp did not exist; the desired end state already holds.
    AlreadyAbsent,
}

/// Repository interface for chirp operations.
pub trait PostRepository {
    fn create_post(&self, body: &str, author_id: UserId) -> RepoResult<Post>;
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    fn delete_post(&self, id: PostId, requester_id: UserId) -> RepoResult<DeleteOutcome>;
}

impl PostRepository for JsonRepository {
    fn create_post(&self, body: &str, author_id: UserId) -> RepoResult<Post> {
        let strategy = self.id_assignment();
        let post = self.write(|doc| {
            let id = doc
                .next_post_id(strategy)
                .map_err(|err| self.unusable_document(err))?;
            let post = Post::new(id, body, author_id);
            doc.chirps.insert(id, post.clone());
            Ok(Change::Persist(post))
        })?;

        info!(
            "event=post_create module=repo status=ok post_id={} author_id={}",
            post.id, post.author_id
        );
        Ok(post)
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        self.read(|doc| {
            let matching = doc
                .chirps
                .values()
                .filter(|post| query.author_id.map_or(true, |author| post.author_id == author))
                .cloned();
            let posts: Vec<Post> = match query.order {
                SortOrder::Asc => matching.collect(),
                SortOrder::Desc => matching.rev().collect(),
            };
            Ok(posts)
        })
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        self.read(|doc| Ok(doc.chirps.get(&id).cloned()))
    }

    fn delete_post(&self, id: PostId, requester_id: UserId) -> RepoResult<DeleteOutcome> {
        let outcome = self.write(|doc| match doc.chirps.get(&id) {
            None => Ok(Change::Keep(DeleteOutcome::AlreadyAbsent)),
            Some(post) if !post.is_owned_by(requester_id) => Err(RepoError::Forbidden {
                post_id: id,
                requester_id,
            }),
            Some(_) => {
                doc.chirps.remove(&id);
                Ok(Change::Persist(DeleteOutcome::Deleted))
            }
        });

        match &outcome {
            Ok(result) => info!(
                "event=post_delete module=repo status=ok post_id={} requester_id={} outcome={:?}",
                id, requester_id, result
            ),
            Err(RepoError::Forbidden { .. }) => warn!(
                "event=post_delete module=repo status=forbidden post_id={} requester_id={}",
                id, requester_id
            ),
            Err(_) => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::SortOrder;

    #[test]
    fn sort_param_defaults_to_ascending() {
        assert_eq!(SortOrder::from_param(None), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("sideways")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some(" DESC ")), SortOrder::Desc);
    }
}
