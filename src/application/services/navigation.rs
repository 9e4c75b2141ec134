//! Navigation service
//!
//! Resolves the menu root, collects the visible items, assembles and prunes
//! the tree and renders it as a nested list.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, RenderContext};
use crate::config::{HiddenRootPolicy, NavOptions};
use crate::domain::{navigation_list, Item, ItemId, Markup, NavTree, TreeBuilder};
use crate::infrastructure::traits::ItemRepository;

/// A rendered navigation: the pruned tree and its markup.
///
/// `Display` writes the markup.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub context: RenderContext,
    pub markup: Markup,
}

impl Navigation {
    pub fn tree(&self) -> &NavTree {
        &self.context.tree
    }

    pub fn root(&self) -> &Item {
        &self.context.root
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.markup, f)
    }
}

/// Service for rendering navigation menus relative to a current item.
pub struct NavigationService {
    repo: Arc<dyn ItemRepository>,
}

impl NavigationService {
    /// Create a new navigation service.
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self {
        Self { repo }
    }

    /// Render the menu for `current` as markup.
    pub fn render(&self, current: &Item, options: &NavOptions) -> ApplicationResult<String> {
        Ok(self.navigation(current, options)?.to_string())
    }

    /// Render the menu for the item with id `current`.
    pub fn render_id(&self, current: ItemId, options: &NavOptions) -> ApplicationResult<String> {
        let current = self.repo.get_item(current)?;
        self.render(&current, options)
    }

    /// Run the full pipeline and keep the intermediate results.
    #[instrument(level = "debug", skip(self, current, options), fields(current = current.id))]
    pub fn navigation(&self, current: &Item, options: &NavOptions) -> ApplicationResult<Navigation> {
        let context = self.context(current, options)?.pruned();
        debug!(
            "navigation: {} nodes after pruning, current shown: {}",
            context.tree.len(),
            context.shows_current()
        );
        let markup = self.render_markup(&context)?;
        Ok(Navigation { context, markup })
    }

    /// Resolve, collect and build; the returned tree is not yet pruned.
    pub fn context(&self, current: &Item, options: &NavOptions) -> ApplicationResult<RenderContext> {
        options.validate()?;
        let root = self.resolve_root(current, options)?;
        let items = self.collect_items(&root, options)?;
        let tree = TreeBuilder::new()
            .with_max_depth(options.max_depth)
            .build(&root, &items)?;
        Ok(RenderContext {
            current: current.clone(),
            root,
            items,
            tree,
            options: options.clone(),
        })
    }

    /// The item the menu starts at: the current item itself, or its
    /// top-most ancestor.
    #[instrument(level = "debug", skip(self, current, options), fields(current = current.id))]
    pub fn resolve_root(&self, current: &Item, options: &NavOptions) -> ApplicationResult<Item> {
        if options.only_descendants || current.is_top_level() {
            return Ok(current.clone());
        }

        let chain = self.repo.ancestor_chain(current.id)?;
        let root = match chain.last() {
            Some(&top) => self.repo.get_item(top)?,
            None => current.clone(),
        };
        debug!("resolve_root: {} -> {}", current.id, root.id);
        Ok(root)
    }

    /// Root followed by all of its descendants that are not flagged hidden.
    ///
    /// Only directly flagged items are removed; their children drop out later
    /// because their parent is missing from the collection.
    #[instrument(level = "debug", skip(self, root, options), fields(root = root.id))]
    pub fn collect_items(&self, root: &Item, options: &NavOptions) -> ApplicationResult<Vec<Item>> {
        let descendants = self.repo.descendants(root.id)?;
        let hidden = self.repo.hidden_ids(&options.hidden_filter_key)?;

        if hidden.contains(&root.id) {
            match options.hidden_root {
                HiddenRootPolicy::Show => debug!("root {} is hidden, showing it anyway", root.id),
                HiddenRootPolicy::Fail => return Err(ApplicationError::RootHidden(root.id)),
            }
        }

        let mut items = Vec::with_capacity(descendants.len() + 1);
        items.push(root.clone());
        items.extend(
            descendants
                .into_iter()
                .filter(|item| item.id != root.id && !hidden.contains(&item.id)),
        );
        debug!(
            "collect_items: {} items ({} hidden ids)",
            items.len(),
            hidden.len()
        );
        Ok(items)
    }

    /// Markup for the (pruned) tree in `context`.
    pub fn render_markup(&self, context: &RenderContext) -> ApplicationResult<Markup> {
        let markup = navigation_list(
            &context.tree,
            context.current.id,
            &context.options.current_item_marker,
            |id| self.repo.resolve_url(id),
        )?;
        Ok(markup)
    }
}
