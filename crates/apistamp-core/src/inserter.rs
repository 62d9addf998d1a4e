//! The API version inserter and its builder

use crate::error::{ConfigError, InsertError};
use crate::formatter::{DisplayFormatter, VersionFormatter};
use crate::request::RequestParts;
use crate::strategy::InsertionStrategy;
use crate::version::ApiVersion;
use http::header::HeaderName;
use std::fmt;
use std::sync::Arc;

/// Stamps an API version onto outgoing requests
///
/// Holds one [`InsertionStrategy`] and one [`VersionFormatter`]. It has no
/// mutable state, so a single instance is shared by every request a client
/// sends.
///
/// # Example
///
/// ```rust
/// use apistamp_core::{ApiVersion, ApiVersionInserter, RequestParts};
/// use http::Method;
///
/// let inserter = ApiVersionInserter::builder()
///     .use_path_segment(0)
///     .with_version_formatter(|v| format!("v{}", v))
///     .build()
///     .unwrap();
///
/// let mut request = RequestParts::new(Method::GET, "/path");
/// inserter.insert(&ApiVersion::from(1.2), &mut request).unwrap();
/// assert_eq!(request.path(), "/v1.2/path");
/// ```
#[derive(Clone)]
pub struct ApiVersionInserter {
    strategy: InsertionStrategy,
    formatter: Arc<dyn VersionFormatter>,
}

impl ApiVersionInserter {
    /// Start configuring an inserter
    pub fn builder() -> ApiVersionInserterBuilder {
        ApiVersionInserterBuilder::new()
    }

    /// Inserter that adds the version as header `name`
    pub fn use_header(name: impl AsRef<str>) -> Result<Self, ConfigError> {
        Self::builder().use_header(name).build()
    }

    /// Inserter that adds the version as query parameter `name`
    pub fn use_query_param(name: impl Into<String>) -> Result<Self, ConfigError> {
        Self::builder().use_query_param(name).build()
    }

    /// Inserter that inserts the version as the path segment at `index`
    pub fn use_path_segment(index: usize) -> Self {
        Self::from_strategy(InsertionStrategy::PathSegment { index })
    }

    /// Inserter for an already constructed strategy, with the default formatter
    pub fn from_strategy(strategy: InsertionStrategy) -> Self {
        Self {
            strategy,
            formatter: Arc::new(DisplayFormatter),
        }
    }

    /// The configured placement
    pub fn strategy(&self) -> &InsertionStrategy {
        &self.strategy
    }

    /// Render `version` with the configured formatter
    pub fn format(&self, version: &ApiVersion) -> Result<String, InsertError> {
        Ok(self.formatter.format(version)?)
    }

    /// Format `version` and place it on `request`
    ///
    /// Not idempotent: header and query placements add a new entry on every
    /// call.
    pub fn insert(&self, version: &ApiVersion, request: &mut RequestParts) -> Result<(), InsertError> {
        let formatted = self.format(version)?;
        self.strategy.apply(&formatted, request)?;

        tracing::debug!(
            placement = self.strategy.kind(),
            version = %formatted,
            path = %request.path(),
            "Inserted API version"
        );
        Ok(())
    }
}

impl fmt::Debug for ApiVersionInserter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiVersionInserter")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// Placement chosen on the builder, validated in `build`
#[derive(Debug)]
enum Placement {
    Header(String),
    Query(String),
    PathSegment(usize),
}

impl Placement {
    fn kind(&self) -> &'static str {
        match self {
            Self::Header(_) => "header",
            Self::Query(_) => "query_param",
            Self::PathSegment(_) => "path_segment",
        }
    }

    fn into_strategy(self) -> Result<InsertionStrategy, ConfigError> {
        match self {
            Self::Header(name) => {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| ConfigError::InvalidHeaderName(name.clone()))?;
                Ok(InsertionStrategy::Header { name })
            }
            Self::Query(param) if param.is_empty() => Err(ConfigError::EmptyQueryParam),
            Self::Query(param) => Ok(InsertionStrategy::Query { param }),
            Self::PathSegment(index) => Ok(InsertionStrategy::PathSegment { index }),
        }
    }
}

/// Builder for [`ApiVersionInserter`]
///
/// Exactly one of `use_header`, `use_query_param` or `use_path_segment` must
/// be called; `build` reports a missing or repeated placement.
#[derive(Default)]
pub struct ApiVersionInserterBuilder {
    placement: Option<Placement>,
    conflict: Option<(&'static str, &'static str)>,
    formatter: Option<Arc<dyn VersionFormatter>>,
}

impl ApiVersionInserterBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the version in header `name`
    pub fn use_header(self, name: impl AsRef<str>) -> Self {
        self.place(Placement::Header(name.as_ref().to_string()))
    }

    /// Place the version in query parameter `name`
    pub fn use_query_param(self, name: impl Into<String>) -> Self {
        self.place(Placement::Query(name.into()))
    }

    /// Insert the version as the path segment at `index`
    pub fn use_path_segment(self, index: usize) -> Self {
        self.place(Placement::PathSegment(index))
    }

    /// Render versions with `f` instead of their `Display` form
    pub fn with_version_formatter<F>(self, f: F) -> Self
    where
        F: Fn(&ApiVersion) -> String + Send + Sync + 'static,
    {
        self.formatter(f)
    }

    /// Use any [`VersionFormatter`], e.g. a [`TryFormatter`](crate::TryFormatter)
    pub fn formatter(mut self, formatter: impl VersionFormatter + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Validate and produce the inserter
    pub fn build(self) -> Result<ApiVersionInserter, ConfigError> {
        if let Some((first, second)) = self.conflict {
            return Err(ConfigError::MultiplePlacements { first, second });
        }
        let strategy = self
            .placement
            .ok_or(ConfigError::NoPlacement)?
            .into_strategy()?;

        Ok(ApiVersionInserter {
            strategy,
            formatter: self.formatter.unwrap_or_else(|| Arc::new(DisplayFormatter)),
        })
    }

    fn place(mut self, placement: Placement) -> Self {
        match &self.placement {
            Some(existing) if self.conflict.is_none() => {
                self.conflict = Some((existing.kind(), placement.kind()));
            }
            Some(_) => {}
            None => self.placement = Some(placement),
        }
        self
    }
}

impl fmt::Debug for ApiVersionInserterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiVersionInserterBuilder")
            .field("placement", &self.placement)
            .field("conflict", &self.conflict)
            .field("custom_formatter", &self.formatter.is_some())
            .finish()
    }
}
