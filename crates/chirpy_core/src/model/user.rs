//! User account record.
//!
//! # Invariants
//! - `password_hash` holds hash bytes produced outside core; core never
//!   hashes, compares or logs them.
//! - The hash is persisted as standard base64 under the `password` key.

use crate::model::ids::UserId;
use serde::{Deserialize, Serialize};

/// Registered account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "password", with = "base64_bytes")]
    pub password_hash: Vec<u8>,
    /// Premium membership flag toggled by the billing webhook.
    #[serde(rename = "is_chirpy_red")]
    pub is_privileged: bool,
}

impl User {
    /// Creates a non-privileged account.
    pub fn new(id: UserId, email: impl Into<String>, password_hash: Vec<u8>) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash,
            is_privileged: false,
        }
    }
}

// Hash bytes are redacted so accounts can be logged or asserted on safely.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("is_privileged", &self.is_privileged)
            .finish()
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|err| D::Error::custom(format!("invalid base64 password hash: {err}")))
    }
}
