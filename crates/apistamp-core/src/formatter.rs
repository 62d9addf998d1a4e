//! Rendering API versions to their wire form

use crate::error::{BoxError, FormatterError};
use crate::version::ApiVersion;
use std::fmt;
use std::marker::PhantomData;

/// Converts an [`ApiVersion`] into the string placed on the request
///
/// Implementations must be deterministic. Any closure
/// `Fn(&ApiVersion) -> String` is a formatter; use [`TryFormatter`] for a
/// closure that can fail.
pub trait VersionFormatter: Send + Sync {
    /// Render the version
    fn format(&self, version: &ApiVersion) -> Result<String, FormatterError>;
}

impl<F> VersionFormatter for F
where
    F: Fn(&ApiVersion) -> String + Send + Sync,
{
    fn format(&self, version: &ApiVersion) -> Result<String, FormatterError> {
        Ok(self(version))
    }
}

/// Default formatter: the version's `Display` output
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayFormatter;

impl VersionFormatter for DisplayFormatter {
    fn format(&self, version: &ApiVersion) -> Result<String, FormatterError> {
        Ok(version.to_string())
    }
}

/// Formatter that prepends a fixed prefix, e.g. `"v"` to render `v1.2`
#[derive(Debug, Clone)]
pub struct PrefixFormatter {
    prefix: String,
}

impl PrefixFormatter {
    /// Create a prefixing formatter
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl VersionFormatter for PrefixFormatter {
    fn format(&self, version: &ApiVersion) -> Result<String, FormatterError> {
        Ok(format!("{}{}", self.prefix, version))
    }
}

/// Adapts a fallible closure into a [`VersionFormatter`]
///
/// The closure's error is handed back to the caller of `insert` unchanged
/// inside [`FormatterError`].
///
/// ```rust
/// use apistamp_core::{ApiVersion, TryFormatter, VersionFormatter};
///
/// let formatter = TryFormatter::new(|v: &ApiVersion| {
///     v.downcast_ref::<u32>()
///         .map(|n| format!("v{n}"))
///         .ok_or("integer versions only")
/// });
/// assert_eq!(formatter.format(&ApiVersion::from(2u32)).unwrap(), "v2");
/// assert!(formatter.format(&ApiVersion::from("x")).is_err());
/// ```
pub struct TryFormatter<F, E> {
    f: F,
    _error: PhantomData<fn() -> E>,
}

impl<F, E> TryFormatter<F, E>
where
    F: Fn(&ApiVersion) -> Result<String, E> + Send + Sync,
    E: Into<BoxError>,
{
    /// Wrap a fallible formatting closure
    pub fn new(f: F) -> Self {
        Self {
            f,
            _error: PhantomData,
        }
    }
}

impl<F, E> VersionFormatter for TryFormatter<F, E>
where
    F: Fn(&ApiVersion) -> Result<String, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn format(&self, version: &ApiVersion) -> Result<String, FormatterError> {
        (self.f)(version).map_err(FormatterError::new)
    }
}

impl<F, E> fmt::Debug for TryFormatter<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TryFormatter")
    }
}
