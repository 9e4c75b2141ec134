//! In-memory item repository, loadable from a TOML site file.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{Item, ItemId, LookupError};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::ItemRepository;

/// Value of a meta flag that marks an item as set.
pub const FLAG_TRUE: &str = "true";

/// One item as stored in a site file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteItem {
    pub id: ItemId,
    pub title: String,
    /// Parent id; missing or `0` means top level
    #[serde(default)]
    pub parent: Option<ItemId>,
    /// Explicit permalink; `/?p=<id>` if unset
    #[serde(default)]
    pub url: Option<String>,
    /// Free-form meta fields, e.g. `hidden = "true"`
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl SiteItem {
    pub fn new(id: ItemId, title: impl Into<String>, parent: Option<ItemId>) -> Self {
        Self {
            id,
            title: title.into(),
            parent,
            url: None,
            meta: BTreeMap::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set meta flag `key` to `"true"`.
    pub fn flagged(mut self, key: impl Into<String>) -> Self {
        self.meta.insert(key.into(), FLAG_TRUE.to_string());
        self
    }

    pub fn to_item(&self) -> Item {
        Item::new(self.id, self.title.clone(), self.parent)
    }

    fn is_flagged(&self, key: &str) -> bool {
        self.meta.get(key).map(String::as_str) == Some(FLAG_TRUE)
    }
}

/// Top-level layout of a site file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteFile {
    #[serde(default)]
    pub items: Vec<SiteItem>,
}

/// Repository over a fixed, ordered list of items.
///
/// Descendants are returned in store order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    items: Vec<SiteItem>,
    positions: HashMap<ItemId, usize>,
    children: HashMap<ItemId, Vec<ItemId>>,
}

impl InMemoryRepository {
    /// Create a repository. Fails on duplicate item ids.
    pub fn new(items: Vec<SiteItem>) -> InfraResult<Self> {
        let mut positions = HashMap::new();
        let mut children: HashMap<ItemId, Vec<ItemId>> = HashMap::new();
        for (pos, site_item) in items.iter().enumerate() {
            if positions.insert(site_item.id, pos).is_some() {
                return Err(InfraError::SiteFile {
                    source_name: "items".to_string(),
                    message: format!("duplicate item id {}", site_item.id),
                });
            }
            if let Some(parent) = site_item.to_item().parent {
                children.entry(parent).or_default().push(site_item.id);
            }
        }
        Ok(Self {
            items,
            positions,
            children,
        })
    }

    /// Parse a TOML site file.
    pub fn from_toml_str(content: &str) -> InfraResult<Self> {
        let site: SiteFile = toml::from_str(content).map_err(|e| InfraError::SiteFile {
            source_name: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::new(site.items)
    }

    /// Read and parse a TOML site file.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> InfraResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read site file {}", path.display()), e))?;
        let site: SiteFile = toml::from_str(&content).map_err(|e| InfraError::SiteFile {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("loaded {} items from {}", site.items.len(), path.display());
        Self::new(site.items)
    }

    /// All items in store order.
    pub fn items(&self) -> Vec<Item> {
        self.items.iter().map(SiteItem::to_item).collect()
    }

    /// Items without a parent, in store order.
    pub fn top_level(&self) -> Vec<Item> {
        self.items
            .iter()
            .map(SiteItem::to_item)
            .filter(Item::is_top_level)
            .collect()
    }

    /// Items whose parent id is not in the store, in store order.
    ///
    /// These are neither top level nor reachable from any top-level item.
    pub fn orphans(&self) -> Vec<Item> {
        self.items
            .iter()
            .map(SiteItem::to_item)
            .filter(|item| {
                item.parent
                    .is_some_and(|parent| !self.positions.contains_key(&parent))
            })
            .collect()
    }

    fn site_item(&self, id: ItemId) -> Result<&SiteItem, LookupError> {
        self.positions
            .get(&id)
            .map(|&pos| &self.items[pos])
            .ok_or(LookupError::NotFound(id))
    }
}

impl ItemRepository for InMemoryRepository {
    fn get_item(&self, id: ItemId) -> Result<Item, LookupError> {
        self.site_item(id).map(SiteItem::to_item)
    }

    fn ancestor_chain(&self, id: ItemId) -> Result<Vec<ItemId>, LookupError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut cursor = self.get_item(id)?.parent;

        // A parent missing from the store ends the chain
        while let Some(parent_id) = cursor {
            if !seen.insert(parent_id) {
                return Err(LookupError::Malformed {
                    id,
                    reason: format!("ancestor {parent_id} repeats"),
                });
            }
            let Ok(parent) = self.get_item(parent_id) else {
                break;
            };
            chain.push(parent_id);
            cursor = parent.parent;
        }
        Ok(chain)
    }

    fn descendants(&self, root_id: ItemId) -> Result<Vec<Item>, LookupError> {
        self.site_item(root_id)?;

        let mut below = HashSet::new();
        let mut queue = VecDeque::from([root_id]);
        while let Some(current) = queue.pop_front() {
            for &child in self.children.get(&current).into_iter().flatten() {
                if child != root_id && below.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        Ok(self
            .items
            .iter()
            .filter(|site_item| below.contains(&site_item.id))
            .map(SiteItem::to_item)
            .collect())
    }

    fn hidden_ids(&self, filter_key: &str) -> Result<HashSet<ItemId>, LookupError> {
        Ok(self
            .items
            .iter()
            .filter(|site_item| site_item.is_flagged(filter_key))
            .map(|site_item| site_item.id)
            .collect())
    }

    fn resolve_url(&self, id: ItemId) -> Result<String, LookupError> {
        let site_item = self.site_item(id)?;
        Ok(site_item
            .url
            .clone()
            .unwrap_or_else(|| format!("/?p={id}")))
    }
}
