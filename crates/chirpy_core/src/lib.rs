//! Persistent store for the chirpy social-posting service.
//!
//! The whole store is one JSON document. Every operation loads it, applies
//! one change and writes it back while holding a process-wide lock.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{IdAssignment, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{Document, RevocationMarker};
pub use model::ids::{PostId, UserId};
pub use model::post::Post;
pub use model::user::User;
pub use repo::{
    DeleteOutcome, ErrorKind, JsonRepository, PostListQuery, PostRepository, RecordRef, RepoError,
    RepoResult, RevocationRepository, SortOrder, StoreSummary, UserRepository,
};
pub use service::chirp_service::{ChirpError, ChirpService, MAX_CHIRP_BYTES};
pub use service::token_gate::TokenGate;
pub use store::StoreError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
