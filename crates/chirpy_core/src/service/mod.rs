//! Use-case services layered on the repository.
//!
//! # Responsibility
//! - Apply request-level rules (length limit, word masking, fail-closed
//!   token checks) before or after repository calls.
//! - Keep transport layers decoupled from storage details.

pub mod chirp_service;
pub mod token_gate;
