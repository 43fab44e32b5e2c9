//! Account persistence and credential checks.
//!
//! # Invariants
//! - Core stores hash bytes verbatim; hashing and verification happen in
//!   caller-supplied code.
//! - Unknown email and rejected credentials both yield `AuthFailed`.
//! - Email uniqueness is assumed, not enforced; the lowest id wins.

use super::json_repo::{Change, JsonRepository};
use super::{RecordRef, RepoError, RepoResult};
use crate::model::ids::UserId;
use crate::model::user::User;
use log::{info, warn};

/// Repository interface for account operations.
pub trait UserRepository {
    fn create_user(&self, email: &str, password_hash: Vec<u8>) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Finds the account for `email` and asks `verify` to accept its stored
    /// hash.
    fn authenticate_user(&self, email: &str, verify: &dyn Fn(&[u8]) -> bool)
        -> RepoResult<User>;
    fn update_user(&self, id: UserId, email: &str, password_hash: Vec<u8>) -> RepoResult<User>;
    fn set_privilege(&self, id: UserId, is_privileged: bool) -> RepoResult<()>;
}

impl UserRepository for JsonRepository {
    fn create_user(&self, email: &str, password_hash: Vec<u8>) -> RepoResult<User> {
        let strategy = self.id_assignment();
        let user = self.write(|doc| {
            let id = doc
                .next_user_id(strategy)
                .map_err(|err| self.unusable_document(err))?;
            let user = User::new(id, email, password_hash);
            doc.users.insert(id, user.clone());
            Ok(Change::Persist(user))
        })?;

        info!("event=user_create module=repo status=ok user_id={}", user.id);
        Ok(user)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.read(|doc| Ok(doc.users.get(&id).cloned()))
    }

    fn authenticate_user(
        &self,
        email: &str,
        verify: &dyn Fn(&[u8]) -> bool,
    ) -> RepoResult<User> {
        let candidate = self.read(|doc| {
            Ok(doc
                .users
                .values()
                .find(|user| user.email == email)
                .cloned())
        })?;

        match candidate {
            Some(user) if verify(&user.password_hash) => {
                info!("event=user_auth module=repo status=ok user_id={}", user.id);
                Ok(user)
            }
            _ => {
                warn!("event=user_auth module=repo status=rejected");
                Err(RepoError::AuthFailed)
            }
        }
    }

    fn update_user(&self, id: UserId, email: &str, password_hash: Vec<u8>) -> RepoResult<User> {
        let user = self.write(|doc| {
            let user = doc
                .users
                .get_mut(&id)
                .ok_or(RepoError::NotFound(RecordRef::User(id)))?;
            user.email = email.to_owned();
            user.password_hash = password_hash;
            Ok(Change::Persist(user.clone()))
        })?;

        info!("event=user_update module=repo status=ok user_id={}", id);
        Ok(user)
    }

    fn set_privilege(&self, id: UserId, is_privileged: bool) -> RepoResult<()> {
        self.write(|doc| {
            let user = doc
                .users
                .get_mut(&id)
                .ok_or(RepoError::NotFound(RecordRef::User(id)))?;
            user.is_privileged = is_privileged;
            Ok(Change::Persist(()))
        })?;

        info!(
            "event=user_privilege module=repo status=ok user_id={} is_privileged={}",
            id, is_privileged
        );
        Ok(())
    }
}
