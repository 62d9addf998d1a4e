//! Client configuration from the environment
//!
//! Loads base URL, default API version and inserter placement from
//! environment variables (optionally seeded from a `.env` file).
//!
//! # Example
//!
//! ```ignore
//! use apistamp_client::config::{load_dotenv, ClientConfig};
//!
//! // APISTAMP_BASE_URL=http://localhost:8080
//! // APISTAMP_API_VERSION=1.2
//! // APISTAMP_VERSION_HEADER=X-API-Version
//! load_dotenv();
//! let client = ClientConfig::from_env_prefixed("APISTAMP")?
//!     .into_builder()?
//!     .build()?;
//! ```

use crate::client::ClientBuilder;
use crate::error::{ClientError, Result};
use apistamp_core::{ApiVersion, ApiVersionInserter, InserterConfig};
use serde::Deserialize;

/// Environment-backed client settings
///
/// Field names map to SCREAMING_SNAKE_CASE variables, e.g. `base_url`
/// reads `BASE_URL` (or `APISTAMP_BASE_URL` with a prefix).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Client-wide default API version, used as a string value
    pub api_version: Option<String>,
    /// Header to carry the version
    pub version_header: Option<String>,
    /// Query parameter to carry the version
    pub version_query_param: Option<String>,
    /// Path segment index to insert the version at
    pub version_path_segment: Option<i64>,
    /// Prefix prepended to the rendered version
    pub version_prefix: Option<String>,
}

impl ClientConfig {
    /// Load from unprefixed environment variables
    pub fn from_env() -> Result<Self> {
        Ok(envy::from_env::<Self>()?)
    }

    /// Load from variables starting with `{prefix}_`
    pub fn from_env_prefixed(prefix: &str) -> Result<Self> {
        Ok(envy::prefixed(format!("{}_", prefix)).from_env::<Self>()?)
    }

    /// The inserter part of this configuration
    pub fn inserter_config(&self) -> InserterConfig {
        InserterConfig {
            header: self.version_header.clone(),
            query_param: self.version_query_param.clone(),
            path_segment: self.version_path_segment,
            prefix: self.version_prefix.clone(),
        }
    }

    /// Turn the configuration into a client builder
    ///
    /// The inserter is validated here, so a bad placement fails before any
    /// request is built.
    pub fn into_builder(self) -> Result<ClientBuilder> {
        let mut builder = ClientBuilder::new();

        let inserter = self.inserter_config();
        if inserter.is_configured() {
            builder = builder.api_version_inserter(ApiVersionInserter::try_from(inserter)?);
        } else if self.version_prefix.is_some() {
            return Err(ClientError::Config(apistamp_core::ConfigError::NoPlacement));
        }

        if let Some(url) = self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(version) = self.api_version {
            builder = builder.default_api_version(ApiVersion::from(version));
        }

        Ok(builder)
    }
}

impl ClientBuilder {
    /// Create a builder from a [`ClientConfig`]
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.into_builder()
    }
}

/// Load environment variables from a `.env` file, if one exists
///
/// Existing variables are not overridden.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from a specific file
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}
