//! In-memory reconciliation of fetched items and statuses.

use std::collections::HashMap;

use crate::model::{Item, ItemsPayload, Status, StatusPayload, StatusValue};

/// Reconciled catalog state: the current item list plus the latest
/// status map.
///
/// Each poll cycle replaces the item list and the status map wholesale;
/// there is no incremental merge and no deletion tracking across cycles.
/// Status keys without a matching item are simply never looked up, and
/// items without a status entry classify as [`Status::Unknown`].
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    statuses: HashMap<String, StatusValue>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current item list, in server order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// True once at least one item has been loaded.
    #[must_use]
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    /// Replaces the item list with a normalized payload.
    pub fn apply_items(&mut self, payload: ItemsPayload) {
        self.items = payload.into_items();
        tracing::debug!(count = self.items.len(), "item list replaced");
    }

    /// Replaces the status map with a normalized payload.
    ///
    /// Unrecognized payload shapes leave the prior map unchanged.
    pub fn apply_statuses(&mut self, payload: StatusPayload) {
        if let Some(map) = payload.into_map() {
            tracing::debug!(count = map.len(), "status map replaced");
            self.statuses = map;
        }
    }

    /// Classified status for an item id; absent ids are `Unknown`.
    #[must_use]
    pub fn status_of(&self, id: &str) -> Status {
        self.statuses
            .get(id)
            .map_or(Status::Unknown, StatusValue::classify)
    }
}
