//! HTTP client for the catalog server.

use async_trait::async_trait;
use homedash_core::{ItemsPayload, StatusPayload, StatusValue};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::CatalogApi;
use crate::error::{ClientError, Result};

/// Client for the five read endpoints of a catalog server.
///
/// Trailing slashes on the base URL are stripped at construction. When an
/// API key is configured every request carries it as a bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Builds a client for `base_url` with an optional bearer token.
    ///
    /// Fails on unparseable base URLs or when the underlying HTTP client
    /// cannot be constructed; both are recoverable by fixing the
    /// configuration and retrying.
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self> {
        let trimmed = base_url.trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|err| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot serve as a base".to_string(),
            });
        }
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            base,
            api_key: api_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(ToString::to_string),
            http,
        })
    }

    /// The normalized base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut parts) = url.path_segments_mut() {
            parts.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "catalog request");
        let mut request = self.http.get(url).header(ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// `GET /api/items/{id}/status` — live status for a single item.
    ///
    /// The id is percent-encoded into the path.
    pub async fn item_status(&self, id: &str) -> Result<StatusValue> {
        self.get_json(self.endpoint(&["api", "items", id, "status"]))
            .await
    }

    /// `GET /api/categories` — category list.
    ///
    /// Exposed for contract parity; the widget derives categories from
    /// the items themselves.
    pub async fn categories(&self) -> Result<serde_json::Value> {
        self.get_json(self.endpoint(&["api", "categories"])).await
    }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn health(&self) -> Result<serde_json::Value> {
        self.get_json(self.endpoint(&["api", "health"])).await
    }

    async fn items(&self) -> Result<ItemsPayload> {
        self.get_json(self.endpoint(&["api", "items"])).await
    }

    async fn all_status(&self) -> Result<StatusPayload> {
        self.get_json(self.endpoint(&["api", "status"])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let client = ApiClient::new("http://nas.local:3000///", None).unwrap();
        assert_eq!(client.base_url(), "http://nas.local:3000/");
        assert_eq!(
            client.endpoint(&["api", "health"]).as_str(),
            "http://nas.local:3000/api/health"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let client = ApiClient::new("http://nas.local:3000/dash/", None).unwrap();
        assert_eq!(
            client.endpoint(&["api", "items"]).as_str(),
            "http://nas.local:3000/dash/api/items"
        );
    }

    #[test]
    fn item_id_is_percent_encoded() {
        let client = ApiClient::new("http://nas.local:3000", None).unwrap();
        assert_eq!(
            client
                .endpoint(&["api", "items", "my service/1", "status"])
                .as_str(),
            "http://nas.local:3000/api/items/my%20service%2F1/status"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiClient::new("not a url", None).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));

        let err = ApiClient::new("data:text/plain,hi", None).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn blank_api_key_is_dropped() {
        let client = ApiClient::new("http://nas.local:3000", Some("   ")).unwrap();
        assert!(client.api_key.is_none());

        let client = ApiClient::new("http://nas.local:3000", Some("secret")).unwrap();
        assert_eq!(client.api_key.as_deref(), Some("secret"));
    }
}
