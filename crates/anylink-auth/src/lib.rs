//! # anylink-auth
//!
//! Challenge-response authentication against the local application.
//!
//! Provides the append-only credential file (`credential_store`) and the
//! session bootstrap state machine (`bootstrap`) that turns a cached or
//! freshly obtained application key into an authenticated
//! [`anylink_rpc::Session`].

pub mod bootstrap;
pub mod credential_store;
pub mod error;

pub use bootstrap::{AuthState, CodeSource, FixedCodes, SessionBootstrapper};
pub use credential_store::CredentialStore;
pub use error::AuthError;
