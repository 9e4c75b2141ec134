//! Domain entities: core data structures

use std::fmt;

/// Stable, unique identifier of a content item.
pub type ItemId = u64;

/// A single content item (post/page) as seen by the navigation.
///
/// URLs are not part of the item: they are resolved by the repository at
/// render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Parent item, `None` for top-level items
    pub parent: Option<ItemId>,
}

impl Item {
    /// Create an item. A parent id of `0` means "no parent".
    pub fn new(id: ItemId, title: impl Into<String>, parent: Option<ItemId>) -> Self {
        Self {
            id,
            title: title.into(),
            parent: parent.filter(|&p| p != 0),
        }
    }

    /// True if the item has no parent.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id)
    }
}
