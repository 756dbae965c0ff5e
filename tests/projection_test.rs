use treepanel::core::node_state::{reproject, SelectionStore};
use treepanel::core::projection::{
    prune_to_selected, set_all_expanded, toggle_expand, visible_rows, VisibleRow,
};
use treepanel::core::search::{annotate_search, SearchPattern};
use treepanel::core::tree::{build_tree, Tree};

fn sample_tree() -> Tree {
    build_tree(&[
        "a:Alpha:company,x1:X1:country",
        "a:Alpha:company,x2:X2:country",
        "b:Beta:company,y1:Y1:country",
    ])
    .unwrap()
}

fn visible_ids(tree: &Tree) -> Vec<(String, usize)> {
    visible_rows(tree)
        .into_iter()
        .map(|row: VisibleRow| (tree.node(row.node).id.clone(), row.depth))
        .collect()
}

fn ids(pairs: &[(&str, usize)]) -> Vec<(String, usize)> {
    pairs
        .iter()
        .map(|(id, depth)| (id.to_string(), *depth))
        .collect()
}

#[test]
fn prune_disabled_returns_tree_unchanged() {
    let tree = sample_tree();
    assert_eq!(prune_to_selected(tree.clone(), false), tree);
}

#[test]
fn prune_keeps_selection_and_its_ancestors() {
    let store = SelectionStore::from_paths([["a", "x1"]]);
    let tree = reproject(sample_tree(), &store);
    let pruned = prune_to_selected(tree, true);

    assert_eq!(pruned.len(), 2);
    let x1 = pruned.find_path(&["a", "x1"]).unwrap();
    assert!(pruned.node(x1).selected);
    assert!(pruned.find_by_id("x2").is_none());
    assert!(pruned.find_by_id("b").is_none());
}

#[test]
fn prune_keeps_manually_expanded_nodes() {
    let mut tree = sample_tree();
    let b = tree.find_by_id("b").unwrap();
    toggle_expand(&mut tree, b);
    let pruned = prune_to_selected(tree, true);
    assert_eq!(pruned.len(), 1);
    assert!(pruned.find_by_id("b").is_some());
    assert!(pruned.find_by_id("y1").is_none());
}

#[test]
fn prune_with_nothing_selected_is_empty() {
    let pruned = prune_to_selected(sample_tree(), true);
    assert!(pruned.is_empty());
}

#[test]
fn collapsed_tree_shows_roots_only() {
    let tree = sample_tree();
    assert_eq!(visible_ids(&tree), ids(&[("a", 0), ("b", 0)]));
    let rows = visible_rows(&tree);
    assert!(rows[0].has_children);
    assert!(!rows[0].shows_children);
}

#[test]
fn expanded_nodes_show_children() {
    let mut tree = sample_tree();
    let a = tree.find_by_id("a").unwrap();
    toggle_expand(&mut tree, a);
    assert_eq!(
        visible_ids(&tree),
        ids(&[("a", 0), ("x1", 1), ("x2", 1), ("b", 0)])
    );

    set_all_expanded(&mut tree, true);
    assert_eq!(visible_rows(&tree).len(), tree.len());
    set_all_expanded(&mut tree, false);
    assert_eq!(visible_ids(&tree), ids(&[("a", 0), ("b", 0)]));
}

#[test]
fn search_opens_ancestors_and_hides_non_matches() {
    let pattern = SearchPattern::compile("y?");
    let tree = annotate_search(sample_tree(), pattern.as_ref());
    assert_eq!(visible_ids(&tree), ids(&[("a", 0), ("b", 0), ("y1", 1)]));
}

#[test]
fn no_match_hides_subtree_even_when_expanded() {
    let mut tree = sample_tree();
    set_all_expanded(&mut tree, true);
    let pattern = SearchPattern::compile("beta");
    let tree = annotate_search(tree, pattern.as_ref());
    // children that do not match stay hidden under expanded roots
    assert_eq!(visible_ids(&tree), ids(&[("a", 0), ("b", 0)]));
}

#[test]
fn roots_stay_visible_when_nothing_matches() {
    let pattern = SearchPattern::compile("zzz");
    let tree = annotate_search(sample_tree(), pattern.as_ref());
    assert_eq!(visible_ids(&tree), ids(&[("a", 0), ("b", 0)]));
    assert!(visible_rows(&tree).iter().all(|row| !row.shows_children));
}
