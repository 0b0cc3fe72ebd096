//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while acquiring or inspecting access tokens.
///
/// # Example
///
/// ```rust
/// use msgraph_api::auth::AuthError;
///
/// let error = AuthError::TokenRequestFailed {
///     status: 401,
///     message: "AADSTS7000215: Invalid client secret provided.".to_string(),
/// };
/// assert!(error.to_string().contains("401"));
/// ```
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint rejected the request or could not be reached.
    ///
    /// `status` is 0 for network errors.
    #[error("Token request failed with status {status}: {message}")]
    TokenRequestFailed {
        /// HTTP status code (0 for network errors).
        status: u16,
        /// Error description from the identity platform.
        message: String,
    },

    /// The access token could not be decoded.
    #[error("Invalid access token: {reason}")]
    InvalidToken {
        /// Why decoding failed.
        reason: String,
    },
}

// Verify AuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthError>();
};
