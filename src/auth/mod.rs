//! Authentication types for the Microsoft Graph SDK.
//!
//! # Overview
//!
//! - [`AccessToken`]: A bearer token attached to every Graph request
//! - [`TokenClaims`]: Unverified claims decoded from a token, for diagnostics
//! - [`acquire_token`]: OAuth 2.0 client credentials grant (app-only access)
//! - [`AuthError`]: Token acquisition and decoding failures
//!
//! The SDK does not manage token lifetimes: acquire a token, build clients
//! with it, and rebuild them once [`AccessToken::expired`] reports `true`.
//!
//! # Example
//!
//! ```rust
//! use msgraph_api::AccessToken;
//!
//! let token = AccessToken::expiring_in("eyJ0eXAi...", 3600);
//! assert!(token.is_active());
//! ```

mod client_credentials;
mod errors;
mod token;

pub use client_credentials::{acquire_token, default_scope, token_url};
pub use errors::AuthError;
pub use token::{AccessToken, TokenClaims};
