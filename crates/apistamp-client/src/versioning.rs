//! Per-request API version resolution
//!
//! The client-wide default version and inserter are captured once when the
//! client is built. Each request may carry its own version, which wins over
//! the default for that request only.

use crate::error::{ClientError, Result};
use apistamp_core::{ApiVersion, ApiVersionInserter, RequestParts};

/// Pick the version in effect for a request
///
/// The per-request version wins; otherwise the client default; otherwise none.
pub fn resolve_api_version<'a>(
    request: Option<&'a ApiVersion>,
    default: Option<&'a ApiVersion>,
) -> Option<&'a ApiVersion> {
    request.or(default)
}

/// Client-wide versioning settings
#[derive(Debug, Clone, Default)]
pub struct VersionSettings {
    default_version: Option<ApiVersion>,
    inserter: Option<ApiVersionInserter>,
}

impl VersionSettings {
    /// Capture a default version and inserter
    pub fn new(default_version: Option<ApiVersion>, inserter: Option<ApiVersionInserter>) -> Self {
        Self {
            default_version,
            inserter,
        }
    }

    /// Client-wide default version
    pub fn default_version(&self) -> Option<&ApiVersion> {
        self.default_version.as_ref()
    }

    /// Configured inserter
    pub fn inserter(&self) -> Option<&ApiVersionInserter> {
        self.inserter.as_ref()
    }

    /// Resolve the version for one request and place it on `parts`
    ///
    /// Does nothing when no version is in effect. Fails with
    /// [`ClientError::NoVersionInserter`] when a version is in effect but no
    /// inserter is configured.
    pub fn apply(&self, request_version: Option<&ApiVersion>, parts: &mut RequestParts) -> Result<()> {
        let Some(version) = resolve_api_version(request_version, self.default_version.as_ref()) else {
            tracing::trace!(path = %parts.path(), "No API version in effect, skipping insertion");
            return Ok(());
        };

        let inserter = self.inserter.as_ref().ok_or(ClientError::NoVersionInserter)?;
        inserter.insert(version, parts)?;
        Ok(())
    }
}
