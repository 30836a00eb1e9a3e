//! Catalog data model and payload normalization.
//!
//! The remote server is loose about shapes: the item list may arrive as a
//! bare array or wrapped in an `items` object, and statuses may arrive as
//! an array of `{id, status}` entries, a wrapped `statuses` field, or a
//! plain id-to-status map. All of that ambiguity is resolved here, at the
//! decode boundary, so the reconciler and the renderer only ever see one
//! internal representation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One catalog entry representing a homelab service or link.
///
/// Identity is `id`; every other field is optional with display fallbacks
/// applied at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, required.
    pub id: String,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short description shown under the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link opened when the tile is activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Grouping key; empty or absent falls back to "Uncategorized".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Named icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Direct icon URL; takes precedence over `icon_slug` and `icon`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Icon slug resolved against the shared icon CDN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_slug: Option<String>,
    /// Free-form tags, order preserved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Item {
    /// Creates a minimal item with only an id set.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            url: None,
            category: None,
            icon: None,
            icon_url: None,
            icon_slug: None,
            tags: Vec::new(),
        }
    }

    /// Name shown on a tile; falls back to "Unnamed".
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed")
    }

    /// Name shown in pick lists; falls back to the id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Category key with the "Uncategorized" fallback applied.
    #[must_use]
    pub fn category_key(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => UNCATEGORIZED,
        }
    }
}

/// Bucket name used for items without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Outcome of the most recent poll cycle.
///
/// This reflects only the latest cycle, never historical health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// A cycle is in flight and no verdict has been reached yet.
    #[default]
    Loading,
    /// The last cycle completed.
    Connected,
    /// The last cycle failed outright.
    Disconnected,
}

impl ConnectionState {
    /// Badge label shown in the widget header.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Loading => "Connecting...",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

/// Tri-state health classification of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The service responded healthy.
    Online,
    /// The service is known to be down.
    Offline,
    /// No status reported, or an unrecognized value.
    Unknown,
}

/// Raw status value as reported by the server.
///
/// Servers report either booleans or strings; anything else is carried
/// through opaquely and classifies as [`Status::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusValue {
    /// Boolean up/down flag.
    Flag(bool),
    /// Textual status such as "online" or "unhealthy".
    Text(String),
    /// Any other JSON value.
    Other(serde_json::Value),
}

impl StatusValue {
    /// Classifies the raw value into the tri-state [`Status`].
    #[must_use]
    pub fn classify(&self) -> Status {
        match self {
            Self::Flag(true) => Status::Online,
            Self::Flag(false) => Status::Offline,
            Self::Text(s) => match s.as_str() {
                "online" | "healthy" => Status::Online,
                "offline" | "unhealthy" => Status::Offline,
                _ => Status::Unknown,
            },
            Self::Other(_) => Status::Unknown,
        }
    }
}

/// Response shape of `GET /api/items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsPayload {
    /// Bare array of items.
    List(Vec<Item>),
    /// Object wrapping the array in an `items` field.
    Keyed {
        /// The wrapped item list.
        items: Vec<Item>,
    },
    /// Anything else; normalizes to an empty list.
    Other(serde_json::Value),
}

impl ItemsPayload {
    /// Normalizes the payload into a plain item list.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        match self {
            Self::List(items) | Self::Keyed { items } => items,
            Self::Other(_) => Vec::new(),
        }
    }
}

/// One `{id, status}` entry from the batch status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Item id the status belongs to.
    pub id: String,
    /// Reported status value.
    pub status: StatusValue,
}

/// Response shape of `GET /api/status`.
///
/// Variant order matters: the map variants would swallow the keyed
/// shapes, so the keyed ones are tried first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusPayload {
    /// Bare array of `{id, status}` entries.
    Entries(Vec<StatusEntry>),
    /// Entries wrapped in a `statuses` field.
    KeyedEntries {
        /// The wrapped entry list.
        statuses: Vec<StatusEntry>,
    },
    /// A map wrapped in a `statuses` field.
    KeyedMap {
        /// The wrapped id-to-status map.
        statuses: HashMap<String, StatusValue>,
    },
    /// Plain id-to-status map.
    Map(HashMap<String, StatusValue>),
    /// Anything else; leaves the prior status map unchanged.
    Other(serde_json::Value),
}

impl StatusPayload {
    /// Normalizes the payload into an id-to-status map.
    ///
    /// Returns `None` for unrecognized shapes, which callers treat as
    /// "keep the previous map".
    #[must_use]
    pub fn into_map(self) -> Option<HashMap<String, StatusValue>> {
        match self {
            Self::Entries(entries) | Self::KeyedEntries { statuses: entries } => Some(
                entries
                    .into_iter()
                    .map(|entry| (entry.id, entry.status))
                    .collect(),
            ),
            Self::KeyedMap { statuses } | Self::Map(statuses) => Some(statuses),
            Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(StatusValue::Text("healthy".into()), Status::Online; "healthy is online")]
    #[test_case(StatusValue::Text("online".into()), Status::Online; "online is online")]
    #[test_case(StatusValue::Flag(true), Status::Online; "true is online")]
    #[test_case(StatusValue::Text("offline".into()), Status::Offline; "offline is offline")]
    #[test_case(StatusValue::Text("unhealthy".into()), Status::Offline; "unhealthy is offline")]
    #[test_case(StatusValue::Flag(false), Status::Offline; "false is offline")]
    #[test_case(StatusValue::Text("weird".into()), Status::Unknown; "unrecognized text is unknown")]
    #[test_case(StatusValue::Other(serde_json::json!(42)), Status::Unknown; "number is unknown")]
    fn classify_status_values(value: StatusValue, expected: Status) {
        assert_eq!(value.classify(), expected);
    }

    #[test]
    fn items_payload_bare_array() {
        let payload: ItemsPayload = serde_json::from_str(r#"[{"id":"z"}]"#).unwrap();
        let items = payload.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "z");
    }

    #[test]
    fn items_payload_keyed_object() {
        let payload: ItemsPayload = serde_json::from_str(r#"{"items":[{"id":"z"}]}"#).unwrap();
        let items = payload.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "z");
    }

    #[test]
    fn items_payload_unrecognized_is_empty() {
        let payload: ItemsPayload = serde_json::from_str(r#"{"count":3}"#).unwrap();
        assert!(payload.into_items().is_empty());

        let payload: ItemsPayload = serde_json::from_str("\"nope\"").unwrap();
        assert!(payload.into_items().is_empty());
    }

    #[test]
    fn status_payload_entry_array() {
        let payload: StatusPayload =
            serde_json::from_str(r#"[{"id":"z","status":"online"}]"#).unwrap();
        let map = payload.into_map().unwrap();
        assert_eq!(map.get("z"), Some(&StatusValue::Text("online".into())));
    }

    #[test]
    fn status_payload_keyed_entries() {
        let payload: StatusPayload =
            serde_json::from_str(r#"{"statuses":[{"id":"a","status":true}]}"#).unwrap();
        let map = payload.into_map().unwrap();
        assert_eq!(map.get("a"), Some(&StatusValue::Flag(true)));
    }

    #[test]
    fn status_payload_plain_map() {
        let payload: StatusPayload =
            serde_json::from_str(r#"{"a":"online","b":false}"#).unwrap();
        let map = payload.into_map().unwrap();
        assert_eq!(map.get("a"), Some(&StatusValue::Text("online".into())));
        assert_eq!(map.get("b"), Some(&StatusValue::Flag(false)));
    }

    #[test]
    fn status_payload_unrecognized_keeps_prior() {
        let payload: StatusPayload = serde_json::from_str("17").unwrap();
        assert!(payload.into_map().is_none());
    }

    #[test]
    fn item_display_fallbacks() {
        let bare = Item::new("jellyfin");
        assert_eq!(bare.display_name(), "Unnamed");
        assert_eq!(bare.label(), "jellyfin");
        assert_eq!(bare.category_key(), UNCATEGORIZED);

        let named = Item {
            name: Some("Jellyfin".into()),
            category: Some("Media".into()),
            ..Item::new("jellyfin")
        };
        assert_eq!(named.display_name(), "Jellyfin");
        assert_eq!(named.category_key(), "Media");

        let empty_category = Item {
            category: Some(String::new()),
            ..Item::new("x")
        };
        assert_eq!(empty_category.category_key(), UNCATEGORIZED);
    }

    #[test]
    fn item_optional_fields_roundtrip() {
        let json = r#"{"id":"pihole","name":"Pi-hole","tags":["dns","adblock"]}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.tags, vec!["dns".to_string(), "adblock".to_string()]);
        assert!(item.url.is_none());

        let back = serde_json::to_string(&item).unwrap();
        let again: Item = serde_json::from_str(&back).unwrap();
        assert_eq!(item, again);
    }
}
