//! Testing utilities for apistamp
//!
//! # Mock Server
//!
//! [`MockServer`] records every request it receives, including the query
//! string, so tests can assert exactly where an API version ended up.
//! Responses come from matcher-based expectations or a FIFO queue.

pub mod expectation;
pub mod matcher;
pub mod server;

pub use expectation::{Expectation, MockResponse, Times};
pub use matcher::RequestMatcher;
pub use server::{MockServer, RecordedRequest};
