//! The trait seam between the widget and the catalog server.
//!
//! The poll loop and the configuration editor only need the three
//! operations below, so they are driven through this trait and can be
//! exercised against an in-memory fake in tests.

use async_trait::async_trait;
use homedash_core::{ItemsPayload, StatusPayload};

use crate::error::Result;

/// Read operations the widget performs against a catalog server.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Connectivity probe; any successful response counts.
    async fn health(&self) -> Result<serde_json::Value>;

    /// Fetches the full item catalog.
    async fn items(&self) -> Result<ItemsPayload>;

    /// Fetches the batch status map for all items.
    async fn all_status(&self) -> Result<StatusPayload>;
}
