//! Core logic for the Homedash widget: a filterable, categorized view of
//! a remote homelab service catalog.
//!
//! This crate is deliberately I/O-free. It owns the data model with its
//! shape-tolerant payload decoding, the reconciler that merges fetched
//! items and statuses, the pure filter/group engine, the persisted widget
//! configuration, and the per-mount view state. Fetching lives in
//! `homedash-client`; rendering and the poll loop live in `homedash-tui`.
//!
//! # Example
//!
//! ```rust
//! use homedash_core::{arrange, Arrangement, Catalog, ItemsPayload, Status};
//!
//! let mut catalog = Catalog::new();
//! let payload: ItemsPayload = serde_json::from_str(
//!     r#"{"items":[{"id":"pihole","name":"Pi-hole","category":"Network"}]}"#,
//! ).unwrap();
//! catalog.apply_items(payload);
//!
//! let selection = vec!["pihole".to_string()];
//! let arrangement = arrange(catalog.items(), &selection, "", true);
//! assert_eq!(arrangement.len(), 1);
//! assert_eq!(catalog.status_of("pihole"), Status::Unknown);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod view;

pub use catalog::Catalog;
pub use config::{
    DEFAULT_POLL_INTERVAL_SECS, MAX_COLUMNS, MIN_COLUMNS, MIN_POLL_INTERVAL_SECS, WidgetConfig,
};
pub use error::{CoreError, Result};
pub use filter::{Arrangement, arrange, group_by_category, visible_items};
pub use model::{
    ConnectionState, Item, ItemsPayload, Status, StatusEntry, StatusPayload, StatusValue,
    UNCATEGORIZED,
};
pub use view::ViewState;
