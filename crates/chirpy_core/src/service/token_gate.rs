//! Revocation gate for presented tokens.
//!
//! # Invariants
//! - `admits` is fail-closed: a storage failure rejects the token.

use crate::model::document::RevocationMarker;
use crate::repo::{RepoResult, RevocationRepository};
use log::error;

/// Answers whether a signature-valid token may still be used.
pub struct TokenGate<'repo, R: RevocationRepository> {
    repo: &'repo R,
}

impl<'repo, R: RevocationRepository> TokenGate<'repo, R> {
    pub fn new(repo: &'repo R) -> Self {
        Self { repo }
    }

    pub fn revoke(&self, token: &str) -> RepoResult<RevocationMarker> {
        self.repo.revoke_token(token)
    }

    /// Returns `true` only when the store confirms the token is not revoked.
    pub fn admits(&self, token: &str) -> bool {
        match self.repo.is_token_revoked(token) {
            Ok(revoked) => !revoked,
            Err(err) => {
                error!(
                    "event=token_check module=service status=error error_kind={:?} error={}",
                    err.kind(),
                    err
                );
                false
            }
        }
    }
}
