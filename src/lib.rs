//! Hierarchical navigation menus from parent-linked content items.
//!
//! Given a current item, `postnav` finds the subtree to show (the item's
//! top-level ancestor, or the item itself), drops items flagged hidden,
//! optionally collapses branches that are off the path to the current item,
//! and renders the result as nested `<ul>`/`<li>` markup with the current
//! item's link marked.
//!
//! The content store is injected through [`ItemRepository`]:
//!
//! ```
//! use std::sync::Arc;
//! use postnav::config::NavOptions;
//! use postnav::infrastructure::{InMemoryRepository, SiteItem};
//! use postnav::domain::Item;
//!
//! let repo = InMemoryRepository::new(vec![
//!     SiteItem::new(1, "Home", None).with_url("/"),
//!     SiteItem::new(2, "About", Some(1)).with_url("/about"),
//! ])
//! .unwrap();
//!
//! let current = Item::new(2, "About", Some(1));
//! let html = postnav::render(Arc::new(repo), &current, &NavOptions::default()).unwrap();
//! assert!(html.contains(r#"<a href="/about" class="current">About</a>"#));
//! ```

use std::sync::Arc;

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{Navigation, NavigationService};
pub use application::{ApplicationError, ApplicationResult};
pub use crate::config::NavOptions;
pub use infrastructure::traits::ItemRepository;

/// Render the navigation menu for `current`.
pub fn render(
    repo: Arc<dyn ItemRepository>,
    current: &domain::Item,
    options: &NavOptions,
) -> ApplicationResult<String> {
    NavigationService::new(repo).render(current, options)
}
