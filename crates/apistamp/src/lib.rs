//! # apistamp
//!
//! Client-side API versioning for HTTP.
//!
//! Configure a client with an [`ApiVersionInserter`] and, optionally, a
//! default version. Every request then carries the version in the chosen
//! place: a header, a query parameter, or a path segment. A request can
//! override the default for itself only.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apistamp::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> apistamp::Result<()> {
//!     let client = Client::builder()
//!         .base_url("http://localhost:8080")
//!         .default_api_version(1.2)
//!         .api_version_inserter(ApiVersionInserter::use_header("X-API-Version")?)
//!         .build()?;
//!
//!     // GET /users with X-API-Version: 1.2
//!     client.get("/users").send().await?;
//!
//!     // GET /users with X-API-Version: 2
//!     client.get("/users").api_version(2u32).send().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Placements
//!
//! | Constructor | `/path`, version `1.2` |
//! |-------------|------------------------|
//! | `use_header("X-API-Version")` | header `X-API-Version: 1.2` |
//! | `use_query_param("api-version")` | `/path?api-version=1.2` |
//! | `use_path_segment(0)` with formatter `v{}` | `/v1.2/path` |
//! | `use_path_segment(1)` with formatter `v{}` | `/path/v1.2` |
//! | `use_path_segment(2)` | error: `Cannot insert version into '/path' at path segment index 2` |
//!
//! ## Optional Features
//!
//! - `testing` - re-exports the recording `MockServer` as `apistamp::testing`

pub use apistamp_client::*;
pub use apistamp_core::*;

#[cfg(feature = "testing")]
pub use apistamp_testing as testing;

/// Re-export of the `http` crate
pub use http;

/// Common imports
pub mod prelude {
    pub use apistamp_client::{Client, ClientBuilder, ClientError, ClientResponse, RequestBuilder};
    pub use apistamp_core::{
        ApiVersion, ApiVersionInserter, ConfigError, InsertError, InsertionStrategy, TryFormatter,
        VersionFormatter,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_builds_request() {
        let client = Client::builder()
            .base_url("http://localhost")
            .api_version_inserter(ApiVersionInserter::use_path_segment(0))
            .build()
            .unwrap();

        let request = client.get("/path").api_version("v3").build().unwrap();

        assert_eq!(request.uri().path(), "/v3/path");
    }
}
