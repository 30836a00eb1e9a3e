//! HTTP client for the Homedash catalog server.
//!
//! Thin wrapper over five read-only JSON endpoints: health probe, item
//! catalog, single-item status, category list and batch status. Requests
//! carry `Accept: application/json` and, when configured, a bearer
//! token. Any non-success HTTP status is surfaced as
//! [`ClientError::Status`] with the numeric code and reason phrase;
//! callers treat it as terminal for that call.
//!
//! The [`CatalogApi`] trait covers the subset of operations the widget
//! core needs, so the poll loop can run against a fake server in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod client;
pub mod error;

pub use api::CatalogApi;
pub use client::ApiClient;
pub use error::{ClientError, Result};
