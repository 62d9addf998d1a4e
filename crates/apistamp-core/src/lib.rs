//! # apistamp core
//!
//! Places an API version on outgoing HTTP requests.
//!
//! An [`ApiVersionInserter`] combines one [`InsertionStrategy`] (header,
//! query parameter or path segment) with a [`VersionFormatter`]. It is built
//! once, shared by every request, and applied to a [`RequestParts`] just
//! before the request is sent.
//!
//! ```rust
//! use apistamp_core::{ApiVersion, ApiVersionInserter, RequestParts};
//! use http::Method;
//!
//! let inserter = ApiVersionInserter::use_query_param("api-version").unwrap();
//! let mut request = RequestParts::new(Method::GET, "/path");
//!
//! inserter.insert(&ApiVersion::from(1.2), &mut request).unwrap();
//! assert_eq!(request.path_and_query(), "/path?api-version=1.2");
//! ```
//!
//! This crate is not meant to be used directly. Use `apistamp` instead.

mod config;
mod error;
mod formatter;
mod inserter;
mod request;
mod strategy;
mod version;

pub use config::InserterConfig;
pub use error::{BoxError, ConfigError, FormatterError, InsertError};
pub use formatter::{DisplayFormatter, PrefixFormatter, TryFormatter, VersionFormatter};
pub use inserter::{ApiVersionInserter, ApiVersionInserterBuilder};
pub use request::RequestParts;
pub use strategy::InsertionStrategy;
pub use version::ApiVersion;
