//! Widget configuration.
//!
//! The config record is replaced wholesale on every editor change and
//! persisted as a JSON file between runs. Display options with defaults
//! are never fatal; a missing server URL is, at setup time.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Minimum poll period in seconds; shorter configured values clamp up.
pub const MIN_POLL_INTERVAL_SECS: u64 = 10;

/// Default poll period in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Grid column bounds.
pub const MIN_COLUMNS: u16 = 1;
/// Upper grid column bound.
pub const MAX_COLUMNS: u16 = 6;

/// Persisted widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Title shown in the widget header.
    pub title: String,
    /// Base URL of the catalog server. Required and non-empty.
    pub server_url: String,
    /// Optional bearer token for the catalog server.
    pub api_key: Option<String>,
    /// Grid column count, clamped to 1..=6 at render time.
    pub columns: u16,
    /// Show the search bar.
    pub show_search: bool,
    /// Group tiles by category.
    pub show_categories: bool,
    /// Show status dots on tiles.
    pub show_status: bool,
    /// Poll period in seconds, clamped to at least 10.
    pub poll_interval: u64,
    /// Explicit allow-list of item ids to render. Empty renders nothing.
    pub selected_items: Vec<String>,
    /// Open links in a new tab. Kept for host compatibility; the
    /// terminal rendition always defers to the platform opener.
    pub open_in_new_tab: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: "Homedash".to_string(),
            server_url: String::new(),
            api_key: None,
            columns: 3,
            show_search: true,
            show_categories: true,
            show_status: true,
            poll_interval: DEFAULT_POLL_INTERVAL_SECS,
            selected_items: Vec::new(),
            open_in_new_tab: true,
        }
    }
}

impl WidgetConfig {
    /// Validates the configuration at setup time.
    ///
    /// The only fatal condition is a missing or empty server URL.
    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig {
                reason: "server_url is required".to_string(),
            });
        }
        Ok(())
    }

    /// Effective poll period with the lower bound applied.
    #[must_use]
    pub fn effective_poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval.max(MIN_POLL_INTERVAL_SECS))
    }

    /// Effective column count, clamped to the 1..=6 range.
    #[must_use]
    pub fn effective_columns(&self) -> u16 {
        self.columns.clamp(MIN_COLUMNS, MAX_COLUMNS)
    }

    /// Bearer token, treating an empty string as unset.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw).map_err(|source| CoreError::ConfigWrite {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn defaults_match_widget_surface() {
        let config = WidgetConfig::default();
        assert_eq!(config.title, "Homedash");
        assert_eq!(config.columns, 3);
        assert!(config.show_search);
        assert!(config.show_categories);
        assert!(config.show_status);
        assert_eq!(config.poll_interval, 30);
        assert!(config.selected_items.is_empty());
        assert!(config.open_in_new_tab);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn missing_server_url_is_fatal() {
        let config = WidgetConfig::default();
        assert!(config.validate().is_err());

        let blank = WidgetConfig {
            server_url: "   ".to_string(),
            ..WidgetConfig::default()
        };
        assert!(blank.validate().is_err());

        let ok = WidgetConfig {
            server_url: "http://nas.local:3000".to_string(),
            ..WidgetConfig::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test_case(5, 10; "below minimum clamps up")]
    #[test_case(10, 10; "at minimum unchanged")]
    #[test_case(120, 120; "above minimum unchanged")]
    fn poll_interval_clamps(configured: u64, effective: u64) {
        let config = WidgetConfig {
            poll_interval: configured,
            ..WidgetConfig::default()
        };
        assert_eq!(
            config.effective_poll_interval(),
            Duration::from_secs(effective)
        );
    }

    #[test_case(0, 1)]
    #[test_case(3, 3)]
    #[test_case(9, 6)]
    fn columns_clamp(configured: u16, effective: u16) {
        let config = WidgetConfig {
            columns: configured,
            ..WidgetConfig::default()
        };
        assert_eq!(config.effective_columns(), effective);
    }

    #[test]
    fn empty_api_key_is_no_token() {
        let mut config = WidgetConfig::default();
        assert!(config.bearer_token().is_none());

        config.api_key = Some(String::new());
        assert!(config.bearer_token().is_none());

        config.api_key = Some("secret".to_string());
        assert_eq!(config.bearer_token(), Some("secret"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: WidgetConfig =
            serde_json::from_str(r#"{"server_url":"http://h:3000","poll_interval":60}"#).unwrap();
        assert_eq!(config.server_url, "http://h:3000");
        assert_eq!(config.poll_interval, 60);
        assert_eq!(config.columns, 3);
        assert_eq!(config.title, "Homedash");
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.json");

        let config = WidgetConfig {
            server_url: "http://nas.local:3000".to_string(),
            selected_items: vec!["a".to_string(), "b".to_string()],
            ..WidgetConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = WidgetConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = WidgetConfig::load(Path::new("/nonexistent/widget.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/widget.json"));
    }
}
