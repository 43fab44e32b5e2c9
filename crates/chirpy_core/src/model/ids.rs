//! Strongly-typed record identifiers.
//!
//! # Invariants
//! - Ids are assigned by the repository starting at 1.
//! - Ids serialize as plain JSON integers inside records, and as decimal
//!   strings when used as map keys (see `document::id_keyed`).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifier of a chirp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

/// Identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Integer-backed key of an id-keyed document map.
pub trait RecordKey: Copy + Ord {
    fn from_raw(raw: u64) -> Self;
    fn raw(self) -> u64;
}

impl RecordKey for PostId {
    fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    fn raw(self) -> u64 {
        self.0
    }
}

impl RecordKey for UserId {
    fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    fn raw(self) -> u64 {
        self.0
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
