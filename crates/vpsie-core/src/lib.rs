//! # vpsie-core
//!
//! Core types and utilities for working with the VPSie REST API.
//!
//! This crate provides the shared error type, client configuration, and the HTTP
//! [`client::ServiceClient`] that every resource crate delegates to.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`config`] - Configuration structures for VPSie clients
//! - [`client`] - HTTP client, request construction and response decoding
//! - [`envelope`] - The `{error, data}` response wrapper
//! - [`query`] - Query string helpers and list pagination options
//! - [`types`] - API resources, shared request fragments and identifier checks

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use envelope::{Envelope, Page};
pub use error::{Error, Result};
pub use query::ListOptions;
