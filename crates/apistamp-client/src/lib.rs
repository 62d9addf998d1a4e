//! # apistamp client
//!
//! HTTP client that places an API version on every outgoing request.
//!
//! A client holds an optional default [`ApiVersion`] and an optional
//! [`ApiVersionInserter`]. Each request may override the version. When a
//! version is in effect the inserter runs once, after the request's path,
//! headers and query are final and before it reaches the [`Transport`].
//!
//! This crate is not meant to be used directly. Use `apistamp` instead.
//!
//! [`ApiVersion`]: apistamp_core::ApiVersion
//! [`ApiVersionInserter`]: apistamp_core::ApiVersionInserter

mod client;
pub mod config;
mod error;
mod request;
mod response;
mod transport;
mod versioning;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use request::RequestBuilder;
pub use response::ClientResponse;
pub use transport::{HyperTransport, Transport};
pub use versioning::{resolve_api_version, VersionSettings};
