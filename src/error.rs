//! Error types for the Microsoft Graph SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use msgraph_api::{TenantId, ConfigError};
//!
//! let result = TenantId::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyTenantId)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Tenant ID cannot be empty.
    #[error("Tenant ID cannot be empty. Please provide a directory (tenant) ID or domain.")]
    EmptyTenantId,

    /// Tenant ID contains characters that cannot appear in a URL path segment.
    #[error("Invalid tenant ID '{tenant_id}'. Expected a GUID or a verified domain name.")]
    InvalidTenantId {
        /// The invalid tenant ID that was provided.
        tenant_id: String,
    },

    /// Client ID cannot be empty.
    #[error("Client ID cannot be empty. Please provide the application (client) ID.")]
    EmptyClientId,

    /// Client secret cannot be empty.
    #[error("Client secret cannot be empty. Please provide a valid client secret.")]
    EmptyClientSecret,

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected 'v1.0' or 'beta'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Endpoint URL is invalid.
    #[error("Invalid endpoint URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://graph.microsoft.com').")]
    InvalidEndpointUrl {
        /// The invalid URL that was provided.
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tenant_id_error_message() {
        let error = ConfigError::EmptyTenantId;
        let message = error.to_string();
        assert!(message.contains("Tenant ID cannot be empty"));
    }

    #[test]
    fn test_invalid_tenant_id_error_message() {
        let error = ConfigError::InvalidTenantId {
            tenant_id: "bad/tenant".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("bad/tenant"));
        assert!(message.contains("GUID"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "tenant_id" };
        let message = error.to_string();
        assert!(message.contains("tenant_id"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyTenantId;
        let _: &dyn std::error::Error = &error;
    }
}
