//! Tests for NavigationService: root resolution, hiding, pruning, markup

use std::collections::HashSet;
use std::sync::Arc;

use rstest::rstest;

use postnav::application::services::NavigationService;
use postnav::application::ApplicationError;
use postnav::config::{HiddenRootPolicy, NavOptions};
use postnav::domain::{DomainError, Item, ItemId, LookupError};
use postnav::infrastructure::{InMemoryRepository, ItemRepository, SiteItem};
use postnav::util::testing;

fn service(items: Vec<SiteItem>) -> NavigationService {
    testing::init_test_setup();
    let repo = InMemoryRepository::new(items).expect("valid site");
    NavigationService::new(Arc::new(repo))
}

fn item(id: ItemId, title: &str, parent: ItemId) -> SiteItem {
    SiteItem::new(id, title, Some(parent))
}

fn current(id: ItemId, parent: ItemId) -> Item {
    Item::new(id, format!("item {id}"), Some(parent))
}

/// Ids of the nodes in the rendered tree, pre-order.
fn shown_ids(svc: &NavigationService, current: &Item, options: &NavOptions) -> Vec<ItemId> {
    let nav = svc.navigation(current, options).expect("render");
    nav.tree().iter().map(|(_, n)| n.item.id).collect()
}

fn li_count(html: &str) -> usize {
    html.matches("<li>").count()
}

fn full_tree() -> NavOptions {
    NavOptions {
        full_tree: true,
        ..Default::default()
    }
}

// Root(1)
// ├── A(2)
// │   ├── X(4)
// │   │   └── W(6)
// │   │       └── U(8)
// │   └── Y(5)
// │       └── V(7)
// └── B(3)
//     └── Z(9)
fn deep_site() -> Vec<SiteItem> {
    vec![
        SiteItem::new(1, "Root", None),
        item(2, "A", 1),
        item(3, "B", 1),
        item(4, "X", 2),
        item(5, "Y", 2),
        item(6, "W", 4),
        item(7, "V", 5),
        item(8, "U", 6),
        item(9, "Z", 3),
    ]
}

#[test]
fn given_reference_scenario_when_rendering_then_exact_markup() {
    // Arrange
    let svc = service(vec![
        SiteItem::new(1, "Root", Some(0)),
        item(2, "A", 1),
        item(3, "B", 1),
        item(4, "X", 2),
    ]);

    // Act
    let html = svc.render(&current(4, 2), &NavOptions::default()).unwrap();

    // Assert
    assert_eq!(
        html,
        concat!(
            "<ul><li><a href=\"/?p=1\">Root</a><ul>",
            "<li><a href=\"/?p=2\">A</a><ul>",
            "<li><a href=\"/?p=4\" class=\"current\">X</a></li>\n",
            "</ul></li>\n",
            "<li><a href=\"/?p=3\">B</a></li>\n",
            "</ul></li>\n",
            "</ul>"
        )
    );
}

#[test]
fn given_only_descendants_when_rendering_then_root_is_current() {
    let svc = service(deep_site());
    let options = NavOptions {
        only_descendants: true,
        full_tree: true,
        ..Default::default()
    };

    let nav = svc.navigation(&current(2, 1), &options).unwrap();

    assert_eq!(nav.root().id, 2);
    assert_eq!(shown_ids(&svc, &current(2, 1), &options), vec![2, 4, 6, 8, 5, 7]);
}

#[test]
fn given_ancestor_chain_when_resolving_root_then_top_most_ancestor() {
    // A(10) -> B(11) -> C(12 top)
    let svc = service(vec![
        SiteItem::new(12, "C", None),
        item(11, "B", 12),
        item(10, "A", 11),
    ]);

    let root = svc
        .resolve_root(&current(10, 11), &NavOptions::default())
        .unwrap();

    assert_eq!(root.id, 12);
}

#[test]
fn given_top_level_current_when_resolving_root_then_itself() {
    let svc = service(deep_site());
    let root_item = Item::new(1, "Root", None);

    let root = svc.resolve_root(&root_item, &NavOptions::default()).unwrap();

    assert_eq!(root, root_item);
}

#[test]
fn given_hidden_item_when_rendering_then_it_and_its_subtree_are_absent() {
    let mut site = deep_site();
    site[1] = item(2, "A", 1).flagged("hidden");
    let svc = service(site);

    let ids = shown_ids(&svc, &current(3, 1), &full_tree());

    assert_eq!(ids, vec![1, 3, 9]);
    let html = svc.render(&current(3, 1), &full_tree()).unwrap();
    for title in [">A<", ">X<", ">Y<", ">W<", ">V<", ">U<"] {
        assert!(!html.contains(title), "{title} must not be rendered");
    }
}

#[test]
fn given_custom_hidden_key_when_rendering_then_only_that_flag_hides() {
    let mut site = deep_site();
    site[2] = item(3, "B", 1).flagged("hideInNav");
    let svc = service(site);

    let default_key = shown_ids(&svc, &current(2, 1), &NavOptions::default());
    let custom_key = shown_ids(
        &svc,
        &current(2, 1),
        &NavOptions {
            hidden_filter_key: "hideInNav".into(),
            ..Default::default()
        },
    );

    assert!(default_key.contains(&3));
    assert!(!custom_key.contains(&3));
}

#[test]
fn given_sibling_branches_when_pruning_then_only_path_expanded() {
    // Root -> {A, B}, A -> {X, Y}, B -> {Z}
    let svc = service(vec![
        SiteItem::new(1, "Root", None),
        item(2, "A", 1),
        item(3, "B", 1),
        item(4, "X", 2),
        item(5, "Y", 2),
        item(9, "Z", 3),
    ]);

    let nav = svc.navigation(&current(4, 2), &NavOptions::default()).unwrap();
    let tree = nav.tree();

    let ids: Vec<ItemId> = tree.iter().map(|(_, n)| n.item.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5, 3]);
    let children_of_a: Vec<ItemId> = tree.children_of(2).iter().map(|i| i.id).collect();
    assert_eq!(children_of_a, vec![4, 5]);
    assert!(tree.children_of(3).is_empty(), "B must be collapsed");
    assert!(!tree.contains(9));
}

#[test]
fn given_current_with_children_when_pruning_then_direct_children_only() {
    let svc = service(deep_site());

    let ids = shown_ids(&svc, &current(4, 2), &NavOptions::default());

    // W (child of current) stays, U (grandchild), V (child of sibling Y)
    // and Z (child of B) are collapsed away
    assert_eq!(ids, vec![1, 2, 4, 6, 5, 3]);
}

#[test]
fn given_full_tree_when_rendering_then_every_node_is_shown() {
    let svc = service(deep_site());

    let html = svc.render(&current(4, 2), &full_tree()).unwrap();

    assert_eq!(li_count(&html), 9);
}

#[rstest]
#[case::root(1, 1)]
#[case::leaf(9, 3)]
#[case::middle(6, 4)]
fn given_pruned_render_then_li_count_matches_tree_size(
    #[case] id: ItemId,
    #[case] parent: ItemId,
) {
    let svc = service(deep_site());
    let cur = if id == 1 {
        Item::new(1, "Root", None)
    } else {
        current(id, parent)
    };

    let nav = svc.navigation(&cur, &NavOptions::default()).unwrap();

    assert_eq!(li_count(&nav.to_string()), nav.tree().len());
}

#[rstest]
#[case::pruned(NavOptions::default())]
#[case::full(full_tree())]
fn given_visible_current_when_rendering_then_exactly_one_marked_link(#[case] options: NavOptions) {
    let svc = service(deep_site());

    let nav = svc.navigation(&current(5, 2), &options).unwrap();

    let marked: Vec<_> = nav
        .markup
        .elements("a")
        .into_iter()
        .filter(|a| a.attribute("class") == Some("current"))
        .collect();
    assert_eq!(marked.len(), 1);
    assert_eq!(marked[0].attribute("href"), Some("/?p=5"));
}

#[test]
fn given_hidden_current_when_rendering_then_no_marked_link() {
    let mut site = deep_site();
    site[3] = item(4, "X", 2).flagged("hidden");
    let svc = service(site);

    let html = svc.render(&current(4, 2), &full_tree()).unwrap();

    assert!(!html.contains("class="));
}

#[test]
fn given_custom_marker_when_rendering_then_used_as_class() {
    let svc = service(deep_site());
    let options = NavOptions {
        current_item_marker: "WpPostTree-current-post".into(),
        ..Default::default()
    };

    let html = svc.render(&current(3, 1), &options).unwrap();

    assert!(html.contains(r#"<a href="/?p=3" class="WpPostTree-current-post">"#));
}

#[test]
fn given_identical_inputs_when_rendering_twice_then_identical_output() {
    let svc = service(deep_site());
    let first = svc.render(&current(6, 4), &NavOptions::default()).unwrap();
    let second = svc.render(&current(6, 4), &NavOptions::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn given_markup_characters_in_titles_and_urls_when_rendering_then_escaped() {
    let svc = service(vec![
        SiteItem::new(1, "Tom & Jerry <3", None).with_url("/search?q=\"a\"&b"),
    ]);

    let html = svc
        .render(&Item::new(1, "Tom & Jerry <3", None), &NavOptions::default())
        .unwrap();

    assert!(html.contains(">Tom &amp; Jerry &lt;3</a>"));
    assert!(html.contains(r#"href="/search?q=&quot;a&quot;&amp;b""#));
}

#[rstest]
#[case::show(HiddenRootPolicy::Show, true)]
#[case::fail(HiddenRootPolicy::Fail, false)]
fn given_hidden_root_when_rendering_then_policy_applies(
    #[case] policy: HiddenRootPolicy,
    #[case] renders: bool,
) {
    let mut site = deep_site();
    site[0] = SiteItem::new(1, "Root", None).flagged("hidden");
    let svc = service(site);
    let options = NavOptions {
        hidden_root: policy,
        ..Default::default()
    };

    let result = svc.navigation(&current(2, 1), &options);

    if renders {
        assert_eq!(result.unwrap().root().id, 1);
    } else {
        assert_eq!(result.unwrap_err(), ApplicationError::RootHidden(1));
    }
}

#[test]
fn given_unknown_item_when_rendering_by_id_then_lookup_error() {
    let svc = service(deep_site());

    let result = svc.render_id(42, &NavOptions::default());

    assert_eq!(
        result.unwrap_err(),
        ApplicationError::Lookup(LookupError::NotFound(42))
    );
}

#[test]
fn given_zero_max_depth_when_rendering_then_config_error_not_depth_exceeded() {
    let svc = service(vec![SiteItem::new(1, "Root", None)]);
    let options = NavOptions {
        max_depth: 0,
        ..Default::default()
    };

    let result = svc.render(&Item::new(1, "Root", None), &options);

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

// ============================================================
// Stub repository for malformed hierarchies and failures
// ============================================================

/// Repository that serves a fixed descendant list for any root.
struct StubRepository {
    root: Item,
    descendants: Vec<Item>,
    fail_urls: bool,
}

impl ItemRepository for StubRepository {
    fn get_item(&self, id: ItemId) -> Result<Item, LookupError> {
        if id == self.root.id {
            return Ok(self.root.clone());
        }
        self.descendants
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(LookupError::NotFound(id))
    }

    fn ancestor_chain(&self, _id: ItemId) -> Result<Vec<ItemId>, LookupError> {
        Ok(vec![self.root.id])
    }

    fn descendants(&self, _root_id: ItemId) -> Result<Vec<Item>, LookupError> {
        Ok(self.descendants.clone())
    }

    fn hidden_ids(&self, _filter_key: &str) -> Result<HashSet<ItemId>, LookupError> {
        Ok(HashSet::new())
    }

    fn resolve_url(&self, id: ItemId) -> Result<String, LookupError> {
        if self.fail_urls {
            Err(LookupError::Unavailable("permalinks offline".into()))
        } else {
            Ok(format!("/{id}"))
        }
    }
}

fn stub(descendants: Vec<Item>) -> StubRepository {
    StubRepository {
        root: Item::new(1, "Root", None),
        descendants,
        fail_urls: false,
    }
}

#[test]
fn given_orphan_in_descendants_when_building_then_silently_dropped() {
    let repo = stub(vec![Item::new(2, "A", Some(1)), Item::new(3, "Orphan", Some(99))]);
    let svc = NavigationService::new(Arc::new(repo));

    let nav = svc.navigation(&Item::new(2, "A", Some(1)), &full_tree()).unwrap();

    assert_eq!(nav.tree().len(), 2);
    assert_eq!(nav.context.items.len(), 3, "orphan stays in the flat collection");
}

#[test]
fn given_adapter_returning_root_when_collecting_then_root_not_duplicated() {
    let repo = stub(vec![Item::new(1, "Root", None), Item::new(2, "A", Some(1))]);
    let svc = NavigationService::new(Arc::new(repo));

    let nav = svc.navigation(&Item::new(2, "A", Some(1)), &full_tree()).unwrap();

    assert_eq!(li_count(&nav.to_string()), 2);
}

#[test]
fn given_duplicate_item_when_building_then_cycle_detected() {
    let repo = stub(vec![Item::new(2, "A", Some(1)), Item::new(2, "A", Some(2))]);
    let svc = NavigationService::new(Arc::new(repo));

    let result = svc.navigation(&Item::new(2, "A", Some(1)), &NavOptions::default());

    assert_eq!(
        result.unwrap_err(),
        ApplicationError::Domain(DomainError::CycleDetected(2))
    );
}

#[test]
fn given_hierarchy_deeper_than_limit_when_building_then_depth_exceeded() {
    let chain: Vec<Item> = (2..=10).map(|id| Item::new(id, "n", Some(id - 1))).collect();
    let svc = NavigationService::new(Arc::new(stub(chain)));
    let options = NavOptions {
        max_depth: 5,
        ..Default::default()
    };

    let result = svc.navigation(&Item::new(10, "n", Some(9)), &options);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::DepthExceeded { max_depth: 5, .. }))
    ));
}

#[test]
fn given_failing_url_resolver_when_rendering_then_lookup_error() {
    let mut repo = stub(vec![Item::new(2, "A", Some(1))]);
    repo.fail_urls = true;
    let svc = NavigationService::new(Arc::new(repo));

    let result = svc.render(&Item::new(2, "A", Some(1)), &NavOptions::default());

    assert!(matches!(
        result,
        Err(ApplicationError::Lookup(LookupError::Unavailable(_)))
    ));
}

#[test]
fn given_free_render_function_when_called_then_same_as_service() {
    let repo: Arc<dyn ItemRepository> = Arc::new(InMemoryRepository::new(deep_site()).unwrap());
    let via_fn = postnav::render(Arc::clone(&repo), &current(4, 2), &NavOptions::default()).unwrap();
    let via_service = NavigationService::new(repo)
        .render(&current(4, 2), &NavOptions::default())
        .unwrap();
    assert_eq!(via_fn, via_service);
}
