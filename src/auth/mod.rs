//! Authentication core: provider boundary, session-change observers, and
//! the service that owns every session state transition.
//!
//! Flow Overview: login and registration validate local input first, then
//! delegate to the [`IdentityProvider`] under a deadline. A successful round
//! trip persists the session through the store and notifies observers. When
//! the provider is unreachable and demo mode is enabled, the service
//! synthesizes a local `demo_`-prefixed session and logs the substitution at
//! WARN; with demo mode off the provider error is surfaced unchanged.
//!
//! Security boundary: passwords travel as [`secrecy::SecretString`] and are
//! never logged; session tokens are random and only their prefix is ever
//! inspected.

mod observer;
mod provider;
mod rest;
mod service;

pub use observer::{NavAffordances, NavLink, SessionObserver};
pub use provider::{IdentityProvider, UserRecord};
pub use rest::RestProvider;
pub use service::{AuthConfig, AuthService, RegisterRequest, VerificationDoc};
