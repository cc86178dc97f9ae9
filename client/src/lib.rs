//! Client core for the restructuring application
//!
//! This crate implements everything below the UI of the restructuring
//! journey client: environment configuration, the authenticated API client,
//! the auth session manager with its token-expiry watchdog, locally
//! persisted form drafts, the anonymous-draft synchronizer that runs after
//! login, the structured remote logger, and typed repositories over the
//! backend REST surface.

pub mod api;
pub mod auth;
pub mod config;
pub mod drafts;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod sync;
pub mod token;
