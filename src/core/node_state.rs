//! Selection state that survives tree rebuilds.
//!
//! The store keeps the id path (root to node) of each selected node, not node
//! handles. Ids are only unique within one parent's child list, so a bare id
//! could name an ancestor and a descendant at once. After every rebuild
//! [`reproject`] marks nodes at stored paths selected and expands their
//! ancestors so the selection stays visible.

use crate::core::tree::{NodeId, Tree};
use std::collections::HashSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionStore {
    /// Selected id paths in traversal order of the tree they were read from.
    selected_paths: Vec<Vec<String>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, P, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        store.replace(
            paths
                .into_iter()
                .map(|path| path.into_iter().map(Into::into).collect())
                .collect(),
        );
        store
    }

    pub fn paths(&self) -> &[Vec<String>] {
        &self.selected_paths
    }

    /// Last id of every stored path.
    pub fn ids(&self) -> Vec<String> {
        self.selected_paths
            .iter()
            .filter_map(|path| path.last().cloned())
            .collect()
    }

    pub fn contains<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.selected_paths.iter().any(|selected| {
            selected.len() == path.len()
                && selected
                    .iter()
                    .zip(path)
                    .all(|(left, right)| left == right.as_ref())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.selected_paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected_paths.clear();
    }

    /// Replace the stored paths, dropping repeats but keeping first-seen order.
    pub fn replace(&mut self, paths: Vec<Vec<String>>) {
        let mut seen = HashSet::new();
        self.selected_paths = paths
            .into_iter()
            .filter(|path| seen.insert(path.clone()))
            .collect();
    }

    /// Record the selection currently marked on `tree`.
    pub fn sync_from_tree(&mut self, tree: &Tree, selected: &[NodeId]) {
        self.replace(selected.iter().map(|id| tree.path_ids(*id)).collect());
    }
}

/// Mark every node whose id path is in `store` selected and expand its
/// ancestors.
///
/// Running it twice with the same store leaves the tree unchanged.
pub fn reproject(mut tree: Tree, store: &SelectionStore) -> Tree {
    if store.is_empty() {
        return tree;
    }
    let wanted: HashSet<&[String]> = store.paths().iter().map(Vec::as_slice).collect();
    for id in tree.depth_first() {
        if !wanted.contains(tree.path_ids(id).as_slice()) {
            continue;
        }
        tree.node_mut(id).selected = true;
        let ancestors: Vec<NodeId> = tree.ancestors(id).collect();
        for ancestor in ancestors {
            tree.node_mut(ancestor).expanded = true;
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_dedups_in_order() {
        let store = SelectionStore::from_paths([vec!["r", "b"], vec!["a"], vec!["r", "b"]]);
        assert_eq!(store.ids(), vec!["b".to_string(), "a".to_string()]);
        assert!(store.contains(&["a"]));
        assert!(store.contains(&["r", "b"]));
        assert!(!store.contains(&["b"]));
    }
}
