//! Version insertion strategies
//!
//! Each strategy names one place on an outgoing request where the
//! formatted version is written.

use crate::error::InsertError;
use crate::request::{render_path, RequestParts};
use http::header::{HeaderName, HeaderValue};
use http::uri::PathAndQuery;
use std::fmt;

/// Where the API version is placed on the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionStrategy {
    /// Add a request header
    ///
    /// Example: X-API-Version: 1.2
    Header {
        /// Header name to write the version to
        name: HeaderName,
    },

    /// Add a query parameter
    ///
    /// Example: /users?api-version=1.2
    Query {
        /// Query parameter name
        param: String,
    },

    /// Insert a path segment at `index`
    ///
    /// Example: index 0 on /users gives /v1.2/users
    PathSegment {
        /// Zero-based segment position
        index: usize,
    },
}

impl InsertionStrategy {
    /// Short name used in logs and configuration errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Header { .. } => "header",
            Self::Query { .. } => "query_param",
            Self::PathSegment { .. } => "path_segment",
        }
    }

    /// Write `formatted` onto `request`
    ///
    /// Header and query placements append, leaving existing values for the
    /// same name in place. Path placement fails with
    /// [`InsertError::PathSegmentOutOfRange`] when `index` is greater than the
    /// number of segments; `index` equal to it appends. The formatted version
    /// must be a single URI path segment, else [`InsertError::InvalidPathSegment`].
    pub fn apply(&self, formatted: &str, request: &mut RequestParts) -> Result<(), InsertError> {
        match self {
            Self::Header { name } => {
                let value =
                    HeaderValue::from_str(formatted).map_err(|_| InsertError::InvalidHeaderValue {
                        name: name.to_string(),
                        value: formatted.to_string(),
                    })?;
                request.append_header(name.clone(), value);
                Ok(())
            }
            Self::Query { param } => {
                request.append_query(param.clone(), formatted);
                Ok(())
            }
            Self::PathSegment { index } => insert_segment(request.segments_mut(), *index, formatted),
        }
    }
}

fn insert_segment(segments: &mut Vec<String>, index: usize, value: &str) -> Result<(), InsertError> {
    if !is_path_segment(value) {
        return Err(InsertError::InvalidPathSegment {
            value: value.to_string(),
        });
    }
    if index > segments.len() {
        return Err(InsertError::PathSegmentOutOfRange {
            path: render_path(segments),
            index,
        });
    }
    segments.insert(index, value.to_string());
    Ok(())
}

/// Non-empty, no separators, and only characters a URI path may carry
fn is_path_segment(value: &str) -> bool {
    !value.is_empty()
        && !value.contains(['/', '?', '#'])
        && PathAndQuery::try_from(format!("/{}", value)).is_ok()
}

impl fmt::Display for InsertionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header { name } => write!(f, "header '{}'", name),
            Self::Query { param } => write!(f, "query parameter '{}'", param),
            Self::PathSegment { index } => write!(f, "path segment {}", index),
        }
    }
}
