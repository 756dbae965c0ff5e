//! Host facing views of an annotated tree.

use crate::core::tree::{NodeId, SearchMatch, Tree};

/// Keep only nodes that are selected or expanded, applied top-down.
///
/// Run after [`crate::core::node_state::reproject`] so that ancestors of a
/// selection are already expanded. A node the user expanded by hand also
/// survives, even without a selection below it.
pub fn prune_to_selected(tree: Tree, show_selected_only: bool) -> Tree {
    if !show_selected_only {
        return tree;
    }
    tree.retain(|node| node.selected || node.expanded)
}

/// One displayable line of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleRow {
    pub node: NodeId,
    pub depth: usize,
    pub has_children: bool,
    pub shows_children: bool,
}

/// Whether the children of `id` are currently shown.
pub fn shows_children(tree: &Tree, id: NodeId) -> bool {
    let node = tree.node(id);
    node.expanded || node.search_match == SearchMatch::AncestorOfMatch
}

/// Flatten the tree into the rows a renderer should draw.
///
/// Roots are always drawn. Below them, `NoMatch` nodes are hidden together
/// with their subtree, since the filter applies where a parent lists its
/// children. Children are walked only when the parent is expanded or leads to
/// a search match.
pub fn visible_rows(tree: &Tree) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = tree.roots().iter().rev().map(|id| (*id, 0)).collect();
    while let Some((id, depth)) = stack.pop() {
        let node = tree.node(id);
        if depth > 0 && !node.search_match.is_displayable() {
            continue;
        }
        let open = shows_children(tree, id);
        rows.push(VisibleRow {
            node: id,
            depth,
            has_children: node.has_children(),
            shows_children: open,
        });
        if open {
            for child in tree.children(id).iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
    }
    rows
}

pub fn toggle_expand(tree: &mut Tree, id: NodeId) {
    let node = tree.node_mut(id);
    node.expanded = !node.expanded;
}

/// Set `expanded` on every node.
pub fn set_all_expanded(tree: &mut Tree, expanded: bool) {
    for id in tree.depth_first() {
        tree.node_mut(id).expanded = expanded;
    }
}
