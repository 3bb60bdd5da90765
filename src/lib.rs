//! Client-side core for a decentralized academic plagiarism checker.
//!
//! The crate owns the authentication/session lifecycle for the client
//! application: a durable [`session::SessionStore`], the
//! [`auth::AuthService`] that is the sole writer of session state, a
//! [`guard::RouteGuard`] for page-entry access checks, and observer-based
//! session-change notification so no rendering technology leaks into the
//! core. The analysis/minting backend is reached through the
//! [`api::ArtifactApi`] boundary; a mock implementation fabricates the
//! pipeline for demo use.
//!
//! Flow Overview: login/registration delegate to an [`auth::IdentityProvider`]
//! under a deadline; on success the session is persisted and observers are
//! notified. When the provider is unreachable and demo mode is enabled, a
//! locally synthesized `demo_`-prefixed session is issued instead and the
//! substitution is logged. Demo mode is opt-in; it is never a silent
//! fallback.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod session;

pub use error::Error;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
