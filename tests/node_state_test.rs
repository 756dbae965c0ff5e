use treepanel::core::node_state::{reproject, SelectionStore};
use treepanel::core::tree::{build_tree, Tree};

fn sample_tree() -> Tree {
    build_tree(&["a,b,c", "a,b,d", "e,f"]).unwrap()
}

#[test]
fn reprojection_selects_and_expands_ancestors() {
    let store = SelectionStore::from_paths([["a", "b", "c"]]);
    let tree = reproject(sample_tree(), &store);

    let c = tree.find_path(&["a", "b", "c"]).unwrap();
    assert!(tree.node(c).selected);
    assert!(!tree.node(c).expanded);
    for ancestor in tree.ancestors(c) {
        assert!(tree.node(ancestor).expanded);
        assert!(!tree.node(ancestor).selected);
    }
    let e = tree.find_by_id("e").unwrap();
    assert!(!tree.node(e).expanded);
}

#[test]
fn reprojection_is_idempotent() {
    let store = SelectionStore::from_paths([vec!["a", "b", "d"], vec!["e", "f"]]);
    let once = reproject(sample_tree(), &store);
    let twice = reproject(once.clone(), &store);
    assert_eq!(once, twice);
}

#[test]
fn unknown_ids_are_ignored() {
    let store = SelectionStore::from_paths([["a", "missing"]]);
    let tree = reproject(sample_tree(), &store);
    assert_eq!(tree, sample_tree());
}

#[test]
fn same_id_under_different_parents_is_selected_once() {
    let tree = build_tree(&["p,x", "q,x"]).unwrap();
    let store = SelectionStore::from_paths([["q", "x"]]);
    let tree = reproject(tree, &store);
    let first = tree.find_path(&["p", "x"]).unwrap();
    let second = tree.find_path(&["q", "x"]).unwrap();
    assert!(!tree.node(first).selected);
    assert!(tree.node(second).selected);
    let p = tree.find_by_id("p").unwrap();
    assert!(!tree.node(p).expanded);
}

#[test]
fn nested_repeated_id_keeps_ancestor_unselected() {
    let tree = build_tree(&["a:A:company,a:Inner:site"]).unwrap();
    let inner = tree.find_path(&["a", "a"]).unwrap();
    let mut store = SelectionStore::new();
    store.sync_from_tree(&tree, &[inner]);

    let tree = reproject(build_tree(&["a:A:company,a:Inner:site"]).unwrap(), &store);
    let outer = tree.find_path(&["a"]).unwrap();
    let inner = tree.find_path(&["a", "a"]).unwrap();
    assert!(tree.node(inner).selected);
    assert!(!tree.node(outer).selected);
    assert!(tree.node(outer).expanded);
}

#[test]
fn store_syncs_from_tree_in_traversal_order() {
    let tree = sample_tree();
    let f = tree.find_by_id("f").unwrap();
    let c = tree.find_by_id("c").unwrap();
    let mut store = SelectionStore::new();
    store.sync_from_tree(&tree, &[c, f]);
    assert_eq!(store.ids(), vec!["c".to_string(), "f".to_string()]);
    assert_eq!(
        store.paths(),
        &[
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["e".to_string(), "f".to_string()],
        ]
    );
    assert!(store.contains(&["e", "f"]));
    assert!(!store.contains(&["f"]));
    store.clear();
    assert!(store.is_empty());
}
