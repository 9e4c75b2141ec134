//! I/O boundary traits for testability
//!
//! The navigation core only talks to the content store through
//! [`ItemRepository`], so it can be driven by any host store or by the
//! in-memory adapter in tests.

use std::collections::HashSet;

use crate::domain::{Item, ItemId, LookupError};

/// Read access to the content store.
pub trait ItemRepository: Send + Sync {
    /// Fetch a single item.
    fn get_item(&self, id: ItemId) -> Result<Item, LookupError>;

    /// Ancestor ids of `id`, ordered from its parent up to the top-most item.
    /// Empty for top-level items.
    fn ancestor_chain(&self, id: ItemId) -> Result<Vec<ItemId>, LookupError>;

    /// All items below `root_id`, flat. Whether the root itself is included is
    /// up to the implementation; callers must not rely on it.
    fn descendants(&self, root_id: ItemId) -> Result<Vec<Item>, LookupError>;

    /// Ids of items explicitly flagged with `filter_key`.
    fn hidden_ids(&self, filter_key: &str) -> Result<HashSet<ItemId>, LookupError>;

    /// Link target of an item.
    fn resolve_url(&self, id: ItemId) -> Result<String, LookupError>;
}
