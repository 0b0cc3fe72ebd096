//! Access tokens for Microsoft Graph API calls.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::auth::AuthError;

/// A bearer token used to authorize Graph requests.
///
/// # Thread Safety
///
/// `AccessToken` is `Send + Sync`, making it safe to share across threads.
///
/// # Example
///
/// ```rust
/// use msgraph_api::AccessToken;
///
/// let token = AccessToken::new("eyJ0eXAiOiJKV1Qi...");
/// assert!(token.is_active());
/// assert!(!token.expired());
/// assert_eq!(format!("{:?}", token).contains("eyJ"), false);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The raw bearer token.
    pub token: String,

    /// The token type reported by the issuer (normally `Bearer`).
    pub token_type: String,

    /// When this token expires, if known.
    pub expires: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a bearer token with no known expiry.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_type: "Bearer".to_string(),
            expires: None,
        }
    }

    /// Sets the expiry of this token.
    #[must_use]
    pub const fn with_expiry(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Builds a token from an `expires_in` lifetime in seconds.
    #[must_use]
    pub fn expiring_in(token: impl Into<String>, seconds: i64) -> Self {
        Self::new(token).with_expiry(Utc::now() + Duration::seconds(seconds))
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires.is_some_and(|expires| Utc::now() > expires)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.token.is_empty() && !self.expired()
    }

    /// Decodes the token's claims **without** verifying its signature.
    ///
    /// Tokens issued for Graph are signed by the identity platform; this is
    /// meant for diagnostics (which tenant, which app, which roles), never for
    /// authorization decisions.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if the token is not a well-formed JWT.
    pub fn claims(&self) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<TokenClaims>(&self.token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken {
                reason: e.to_string(),
            })
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"*****")
            .field("token_type", &self.token_type)
            .field("expires", &self.expires)
            .finish()
    }
}

/// The claims of a Graph access token that are useful for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Audience, normally `https://graph.microsoft.com`.
    #[serde(default)]
    pub aud: Option<String>,

    #[serde(default)]
    pub iss: Option<String>,

    /// Tenant the token was issued in.
    #[serde(default)]
    pub tid: Option<String>,

    /// Object ID of the principal.
    #[serde(default)]
    pub oid: Option<String>,

    /// Application (client) ID.
    #[serde(default)]
    pub appid: Option<String>,

    #[serde(default)]
    pub app_displayname: Option<String>,

    /// Application roles granted (app-only tokens).
    #[serde(default)]
    pub roles: Vec<String>,

    /// Delegated scopes, space separated (user tokens).
    #[serde(default)]
    pub scp: Option<String>,

    #[serde(default)]
    pub exp: Option<i64>,

    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Returns the delegated scopes as a list.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scp
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Returns `true` if the token carries the given application role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

// Verify AccessToken is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AccessToken>();
};
