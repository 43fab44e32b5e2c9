//! Revoked-token markers.
//!
//! # Invariants
//! - Tokens are opaque strings matched exactly; they are never logged.
//! - Markers are never removed.
//! - A failed load is an error, never an implicit "not revoked".

use super::json_repo::{Change, JsonRepository};
use super::RepoResult;
use crate::model::document::RevocationMarker;
use chrono::Utc;
use log::info;

/// Repository interface for token revocation.
pub trait RevocationRepository {
    fn is_token_revoked(&self, token: &str) -> RepoResult<bool>;
    /// Records `token` as revoked now. Revoking again refreshes the time.
    fn revoke_token(&self, token: &str) -> RepoResult<RevocationMarker>;
}

impl RevocationRepository for JsonRepository {
    fn is_token_revoked(&self, token: &str) -> RepoResult<bool> {
        self.read(|doc| Ok(doc.revoked_tokens.contains_key(token)))
    }

    fn revoke_token(&self, token: &str) -> RepoResult<RevocationMarker> {
        let marker = RevocationMarker {
            token: token.to_owned(),
            revoked_at: Utc::now(),
        };
        self.write(|doc| {
            doc.revoked_tokens
                .insert(marker.token.clone(), marker.revoked_at);
            Ok(Change::Persist(()))
        })?;

        info!(
            "event=token_revoke module=repo status=ok revoked_at={}",
            marker.revoked_at.to_rfc3339()
        );
        Ok(marker)
    }
}
