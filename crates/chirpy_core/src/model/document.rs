//! Whole-store aggregate persisted as one JSON document.
//!
//! # Responsibility
//! - Define the exact top-level shape of the store file.
//! - Encode integer-keyed maps as string-keyed JSON objects and back.
//! - Assign new record ids.
//!
//! # Invariants
//! - The document has exactly three keys: `chirps`, `users`,
//!   `revoked_tokens`. Anything else fails to decode.
//! - Map keys equal the `id` of the record they hold (`validate`).

use crate::config::IdAssignment;
use crate::model::ids::{PostId, RecordKey, UserId};
use crate::model::post::Post;
use crate::model::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A token that must be rejected regardless of its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationMarker {
    pub token: String,
    pub revoked_at: DateTime<Utc>,
}

/// The persisted store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(with = "id_keyed")]
    pub chirps: BTreeMap<PostId, Post>,
    #[serde(with = "id_keyed")]
    pub users: BTreeMap<UserId, User>,
    pub revoked_tokens: BTreeMap<String, DateTime<Utc>>,
}

/// Structural problem found in a decoded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    ZeroId { collection: &'static str },
    KeyMismatch {
        collection: &'static str,
        key: u64,
        record_id: u64,
    },
    IdSpaceExhausted { collection: &'static str },
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId { collection } => write!(f, "{collection} contains reserved id 0"),
            Self::KeyMismatch {
                collection,
                key,
                record_id,
            } => write!(
                f,
                "{collection} key `{key}` holds a record with id `{record_id}`"
            ),
            Self::IdSpaceExhausted { collection } => {
                write!(f, "{collection} has no id left to assign")
            }
        }
    }
}

impl Error for DocumentValidationError {}

impl Document {
    /// Checks cross-field invariants serde cannot express.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        check_keys("chirps", self.chirps.iter().map(|(k, p)| (k.raw(), p.id.raw())))?;
        check_keys("users", self.users.iter().map(|(k, u)| (k.raw(), u.id.raw())))?;
        Ok(())
    }

    /// Id the next created post receives.
    pub fn next_post_id(
        &self,
        strategy: IdAssignment,
    ) -> Result<PostId, DocumentValidationError> {
        next_id("chirps", &self.chirps, strategy)
    }

    /// Id the next created user receives.
    pub fn next_user_id(
        &self,
        strategy: IdAssignment,
    ) -> Result<UserId, DocumentValidationError> {
        next_id("users", &self.users, strategy)
    }
}

fn check_keys(
    collection: &'static str,
    pairs: impl Iterator<Item = (u64, u64)>,
) -> Result<(), DocumentValidationError> {
    for (key, record_id) in pairs {
        if key == 0 {
            return Err(DocumentValidationError::ZeroId { collection });
        }
        if key != record_id {
            return Err(DocumentValidationError::KeyMismatch {
                collection,
                key,
                record_id,
            });
        }
    }
    Ok(())
}

fn next_id<K: RecordKey, V>(
    collection: &'static str,
    map: &BTreeMap<K, V>,
    strategy: IdAssignment,
) -> Result<K, DocumentValidationError> {
    let raw = match strategy {
        IdAssignment::CollectionSize => u64::try_from(map.len())
            .ok()
            .and_then(|len| len.checked_add(1)),
        IdAssignment::NextAfterMax => match map.keys().next_back() {
            Some(key) => key.raw().checked_add(1),
            None => Some(1),
        },
    };
    raw.map(K::from_raw)
        .ok_or(DocumentValidationError::IdSpaceExhausted { collection })
}

/// Serde adapter for maps keyed by integer ids, stored as JSON objects
/// whose keys are decimal strings.
mod id_keyed {
    use crate::model::ids::RecordKey;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: RecordKey,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_map(map.iter().map(|(key, value)| (key.raw().to_string(), value)))
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: RecordKey,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
        let mut map = BTreeMap::new();
        for (key, value) in raw {
            // Only canonical decimal form: "+1" or "01" would alias "1".
            let id = key
                .parse::<u64>()
                .ok()
                .filter(|id| id.to_string() == key)
                .ok_or_else(|| D::Error::custom(format!("invalid record key `{key}`")))?;
            if map.insert(K::from_raw(id), value).is_some() {
                return Err(D::Error::custom(format!("duplicate record key `{key}`")));
            }
        }
        Ok(map)
    }
}
