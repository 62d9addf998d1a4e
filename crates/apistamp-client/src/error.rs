//! Error types for the apistamp client

use apistamp_core::{BoxError, ConfigError, InsertError};
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Errors raised while building or sending a request
///
/// None of these are retried by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid inserter configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The version could not be placed on the request
    ///
    /// Includes path-shape mismatches and formatter failures, which are
    /// passed through unchanged.
    #[error(transparent)]
    Insert(#[from] InsertError),

    /// A version is in effect for the request but the client has no inserter
    #[error("No ApiVersionInserter configured")]
    NoVersionInserter,

    /// The client was built without a base URL
    #[error("A base URL is required")]
    MissingBaseUrl,

    /// A base URL or request path could not be parsed
    #[error("Invalid URI '{uri}': {source}")]
    InvalidUri {
        /// Offending input
        uri: String,
        /// Parse failure
        #[source]
        source: http::uri::InvalidUri,
    },

    /// A header name or value was rejected
    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    /// The final `http::Request` could not be assembled
    #[error(transparent)]
    Http(#[from] http::Error),

    /// Environment configuration could not be loaded
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),

    /// The transport failed to deliver the request
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),
}

impl ClientError {
    /// Whether the error comes from client wiring rather than the request itself
    ///
    /// `NoVersionInserter` is a misconfiguration; an out-of-range path
    /// segment is not, since it depends on the request path.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::NoVersionInserter
                | Self::MissingBaseUrl
                | Self::InvalidUri { .. }
                | Self::InvalidHeader(_)
                | Self::Env(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misconfiguration_is_distinct_from_path_mismatch() {
        let missing = ClientError::NoVersionInserter;
        assert!(missing.is_misconfiguration());
        assert_eq!(missing.to_string(), "No ApiVersionInserter configured");

        let mismatch = ClientError::from(InsertError::PathSegmentOutOfRange {
            path: "/path".to_string(),
            index: 2,
        });
        assert!(!mismatch.is_misconfiguration());
        assert_eq!(
            mismatch.to_string(),
            "Cannot insert version into '/path' at path segment index 2"
        );
    }
}
