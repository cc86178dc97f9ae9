//! Common library for the restructuring client
//!
//! This crate provides shared functionality used across the client:
//! the typed API error taxonomy and the local key/value storage layer
//! that backs drafts and the persisted session token.

pub mod error;
pub mod storage;
