//! Error types for apistamp-core

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error type used to carry caller-supplied failures unchanged
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors raised while configuring an [`ApiVersionInserter`](crate::ApiVersionInserter)
///
/// These are all fatal: an inserter is never produced from an invalid
/// configuration, so no request is ever built with one.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No placement (`use_header`, `use_query_param`, `use_path_segment`) was chosen
    #[error("Expected one of use_header, use_query_param or use_path_segment to be configured")]
    NoPlacement,

    /// More than one placement was chosen on the same builder
    #[error("Only one API version placement may be configured, found {first} and {second}")]
    MultiplePlacements {
        /// Placement configured first
        first: &'static str,
        /// Placement that conflicted with it
        second: &'static str,
    },

    /// Path segment index supplied through external configuration was negative
    #[error("Path segment index must be >= 0, got {0}")]
    NegativePathSegmentIndex(i64),

    /// Header name is not a valid HTTP field name
    #[error("Invalid API version header name '{0}'")]
    InvalidHeaderName(String),

    /// Query parameter name was empty
    #[error("API version query parameter name must not be empty")]
    EmptyQueryParam,
}

/// Failure raised by a custom [`VersionFormatter`](crate::VersionFormatter)
///
/// Transparent: `Display` and `source()` are those of the wrapped error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct FormatterError(BoxError);

impl FormatterError {
    /// Wrap a formatter failure
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(err.into())
    }

    /// Get the error the formatter returned
    pub fn into_inner(self) -> BoxError {
        self.0
    }

    /// Borrow the error the formatter returned
    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }
}

/// Errors raised while inserting a version into a request
#[derive(Debug, Error)]
pub enum InsertError {
    /// The configured path segment index is past the end of the request path
    #[error("Cannot insert version into '{path}' at path segment index {index}")]
    PathSegmentOutOfRange {
        /// Request path before insertion
        path: String,
        /// Configured index
        index: usize,
    },

    /// The formatted version cannot be carried in an HTTP header
    #[error("Formatted API version '{value}' is not a valid value for header '{name}'")]
    InvalidHeaderValue {
        /// Header name
        name: String,
        /// Formatted version
        value: String,
    },

    /// The formatted version cannot be carried as a single path segment
    #[error("Formatted API version '{value}' is not a valid path segment")]
    InvalidPathSegment {
        /// Formatted version
        value: String,
    },

    /// The version formatter failed
    #[error(transparent)]
    Format(#[from] FormatterError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl StdError for Boom {}

    #[test]
    fn test_out_of_range_message() {
        let err = InsertError::PathSegmentOutOfRange {
            path: "/path".to_string(),
            index: 2,
        };
        assert_eq!(
            err.to_string(),
            "Cannot insert version into '/path' at path segment index 2"
        );
    }

    #[test]
    fn test_formatter_error_is_transparent() {
        let err = InsertError::from(FormatterError::new(Boom));
        assert_eq!(err.to_string(), "boom");

        let InsertError::Format(inner) = err else {
            panic!("expected a format error");
        };
        assert!(inner.get_ref().is::<Boom>());
        assert!(inner.into_inner().downcast::<Boom>().is_ok());
    }
}
