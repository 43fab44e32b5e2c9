//! Persisted domain model for chirps, accounts and revoked tokens.
//!
//! # Responsibility
//! - Define the record shapes stored in the JSON document.
//! - Own the wire encoding of integer-keyed maps.
//!
//! # Invariants
//! - Post and user ids are positive integers, unique within their map.
//! - A record's map key always equals its own `id` field.
//! - Records never carry cleartext passwords; only hash bytes.

pub mod document;
pub mod ids;
pub mod post;
pub mod user;
