//! Inserter configuration from external sources
//!
//! [`InserterConfig`] is the serde shape used when the placement comes from
//! environment variables or a config file rather than code.

use crate::error::ConfigError;
use crate::formatter::PrefixFormatter;
use crate::inserter::ApiVersionInserter;
use serde::Deserialize;

/// Declarative inserter settings
///
/// Exactly one of `header`, `query_param` and `path_segment` must be set.
///
/// # Example
///
/// ```rust
/// use apistamp_core::{ApiVersionInserter, InserterConfig};
///
/// let config = InserterConfig {
///     path_segment: Some(0),
///     prefix: Some("v".to_string()),
///     ..Default::default()
/// };
/// let inserter = ApiVersionInserter::try_from(config).unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InserterConfig {
    /// Header name to carry the version
    pub header: Option<String>,
    /// Query parameter name to carry the version
    pub query_param: Option<String>,
    /// Path segment index to insert the version at
    pub path_segment: Option<i64>,
    /// Prefix prepended to the rendered version, e.g. `v`
    pub prefix: Option<String>,
}

impl InserterConfig {
    /// Whether any placement is configured
    pub fn is_configured(&self) -> bool {
        self.header.is_some() || self.query_param.is_some() || self.path_segment.is_some()
    }
}

impl TryFrom<InserterConfig> for ApiVersionInserter {
    type Error = ConfigError;

    fn try_from(config: InserterConfig) -> Result<Self, Self::Error> {
        let mut builder = ApiVersionInserter::builder();

        if let Some(name) = config.header {
            builder = builder.use_header(name);
        }
        if let Some(param) = config.query_param {
            builder = builder.use_query_param(param);
        }
        if let Some(index) = config.path_segment {
            let index =
                usize::try_from(index).map_err(|_| ConfigError::NegativePathSegmentIndex(index))?;
            builder = builder.use_path_segment(index);
        }
        if let Some(prefix) = config.prefix {
            builder = builder.formatter(PrefixFormatter::new(prefix));
        }

        builder.build()
    }
}
