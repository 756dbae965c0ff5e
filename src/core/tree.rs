//! Arena backed hierarchy tree built from delimited rows.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`], so the
//! parent back-reference used for ancestor walks is just an index.

use crate::core::path_parser::{parse_rows, NodeDescriptor};
use std::fmt;

/// Index of a node inside its [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Search annotation of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMatch {
    #[default]
    Unset,
    NoMatch,
    DirectMatch,
    AncestorOfMatch,
}

impl SearchMatch {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::NoMatch => "noMatch",
            Self::DirectMatch => "directMatch",
            Self::AncestorOfMatch => "ancestorOfMatch",
        }
    }

    /// Whether a node in this state may be rendered.
    pub fn is_displayable(self) -> bool {
        !matches!(self, Self::NoMatch)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub node_type: Option<String>,
    pub parent: Option<NodeId>,
    /// `None` for leaves. `Some` and empty only in a pruned copy whose
    /// children were all dropped.
    pub children: Option<Vec<NodeId>>,
    pub expanded: bool,
    pub selected: bool,
    pub search_match: SearchMatch,
}

impl Node {
    fn from_descriptor(descriptor: NodeDescriptor, parent: Option<NodeId>) -> Self {
        Self {
            id: descriptor.id,
            name: descriptor.name,
            node_type: descriptor.node_type,
            parent,
            children: None,
            expanded: false,
            selected: false,
            search_match: SearchMatch::Unset,
        }
    }

    pub fn has_children(&self) -> bool {
        self.children
            .as_ref()
            .map(|children| !children.is_empty())
            .unwrap_or(false)
    }

    pub fn tooltip(&self) -> String {
        format!(
            "id: {}, name: {}, type: {}",
            self.id,
            self.name,
            self.node_type.as_deref().unwrap_or("-")
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeBuildError {
    /// Column `column` of row `row` names a parent that is not in the
    /// scope built from the previous column.
    ParentNotFound {
        row: usize,
        column: usize,
        parent_id: String,
    },
}

impl fmt::Display for TreeBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeBuildError::ParentNotFound {
                row,
                column,
                parent_id,
            } => write!(
                f,
                "parent not found: \"{parent_id}\" (row {row}, column {column})"
            ),
        }
    }
}

impl std::error::Error for TreeBuildError {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes[id.0].children.as_deref().unwrap_or(&[])
    }

    /// Nodes reachable from the roots, parents before children, siblings in
    /// insertion order.
    pub fn depth_first(&self) -> Vec<NodeId> {
        self.depth_first_from(&self.roots)
    }

    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.depth_first_from(self.children(id))
    }

    fn depth_first_from(&self, start: &[NodeId]) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = start.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            for child in self.children(id).iter().rev() {
                stack.push(*child);
            }
        }
        order
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes[id.0].parent,
        }
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|candidate| candidate == ancestor)
    }

    /// Ids from the root down to `id`, inclusive.
    pub fn path_ids(&self, id: NodeId) -> Vec<String> {
        let mut path: Vec<String> = self
            .ancestors(id)
            .map(|ancestor| self.nodes[ancestor.0].id.clone())
            .collect();
        path.reverse();
        path.push(self.nodes[id.0].id.clone());
        path
    }

    /// First node with `id` in depth-first order.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.depth_first()
            .into_iter()
            .find(|node| self.nodes[node.0].id == id)
    }

    /// Follow a root-to-node path of ids.
    pub fn find_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        let mut scope: Option<NodeId> = None;
        for id in path {
            scope = Some(self.find_in_scope(scope, id.as_ref())?);
        }
        scope
    }

    fn scope(&self, scope: Option<NodeId>) -> &[NodeId] {
        match scope {
            Some(parent) => self.children(parent),
            None => &self.roots,
        }
    }

    fn find_in_scope(&self, scope: Option<NodeId>, id: &str) -> Option<NodeId> {
        self.scope(scope)
            .iter()
            .copied()
            .find(|candidate| self.nodes[candidate.0].id == id)
    }

    fn push_node(&mut self, scope: Option<NodeId>, descriptor: NodeDescriptor) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::from_descriptor(descriptor, scope));
        match scope {
            Some(parent) => self.nodes[parent.0]
                .children
                .get_or_insert_with(Vec::new)
                .push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Copy of the subtrees kept by `keep`, re-indexed into a compact arena.
    /// A node is visited only if its parent was kept.
    pub(crate) fn retain(&self, keep: impl Fn(&Node) -> bool) -> Tree {
        let mut result = Tree::new();
        let mut stack: Vec<(NodeId, Option<NodeId>)> =
            self.roots.iter().rev().map(|root| (*root, None)).collect();
        while let Some((old_id, new_parent)) = stack.pop() {
            let node = &self.nodes[old_id.0];
            if !keep(node) {
                continue;
            }
            let new_id = NodeId(result.nodes.len());
            let mut copy = node.clone();
            copy.parent = new_parent;
            copy.children = node.children.as_ref().map(|_| Vec::new());
            result.nodes.push(copy);
            match new_parent {
                Some(parent) => {
                    if let Some(children) = result.nodes[parent.0].children.as_mut() {
                        children.push(new_id);
                    }
                }
                None => result.roots.push(new_id),
            }
            for child in self.children(old_id).iter().rev() {
                stack.push((*child, Some(new_id)));
            }
        }
        result
    }
}

pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.nodes[current.0].parent;
        Some(current)
    }
}

/// Build a tree from raw rows in one pass.
pub fn build_tree<S: AsRef<str>>(rows: &[S]) -> Result<Tree, TreeBuildError> {
    build_tree_from_descriptors(parse_rows(rows))
}

/// Build a tree from already parsed rows.
///
/// Column 0 of every row is looked up among the roots. Column `j` is looked
/// up in the child list of the node matched by column `j - 1`; a node with
/// the same id in that scope is reused, otherwise a new one is appended.
pub fn build_tree_from_descriptors(
    table: Vec<Vec<NodeDescriptor>>,
) -> Result<Tree, TreeBuildError> {
    let mut tree = Tree::new();
    for (row_index, row) in table.into_iter().enumerate() {
        let mut scope: Option<NodeId> = None;
        let mut previous_id: Option<String> = None;
        for (column, item) in row.into_iter().enumerate() {
            if let Some(parent_id) = previous_id.take() {
                // The previous column was found or inserted in `scope` one step
                // earlier, so this lookup cannot fail for a well-formed table.
                let parent = tree.find_in_scope(scope, &parent_id).ok_or_else(|| {
                    TreeBuildError::ParentNotFound {
                        row: row_index,
                        column,
                        parent_id: parent_id.clone(),
                    }
                })?;
                tree.nodes[parent.0].children.get_or_insert_with(Vec::new);
                scope = Some(parent);
            }
            previous_id = Some(item.id.clone());
            if tree.find_in_scope(scope, &item.id).is_none() {
                tree.push_node(scope, item);
            }
        }
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rows_build_empty_tree() {
        let rows: Vec<String> = Vec::new();
        let tree = build_tree(&rows).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let tree = build_tree(&["a,b,c"]).unwrap();
        let c = tree.find_path(&["a", "b", "c"]).unwrap();
        let names: Vec<&str> = tree
            .ancestors(c)
            .map(|id| tree.node(id).id.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(tree.depth(c), 2);
    }

    #[test]
    fn test_retain_reindexes_parents() {
        let tree = build_tree(&["a,b", "a,c", "d"]).unwrap();
        let pruned = tree.retain(|node| node.id != "b" && node.id != "d");
        assert_eq!(pruned.len(), 2);
        let c = pruned.find_path(&["a", "c"]).unwrap();
        let a = pruned.node(c).parent.unwrap();
        assert_eq!(pruned.node(a).id, "a");
        assert_eq!(pruned.children(a), &[c]);
    }

    #[test]
    fn test_parent_not_found_message() {
        let err = TreeBuildError::ParentNotFound {
            row: 2,
            column: 1,
            parent_id: "eu".to_string(),
        };
        assert_eq!(err.to_string(), "parent not found: \"eu\" (row 2, column 1)");
    }

    #[test]
    fn test_built_parents_have_children_and_pruned_copy_may_be_empty() {
        let tree = build_tree(&["a,b", "a,b", "c"]).unwrap();
        let a = tree.find_by_id("a").unwrap();
        let b = tree.find_by_id("b").unwrap();
        assert_eq!(tree.node(a).children.as_deref(), Some(&[b][..]));
        assert!(tree.node(b).children.is_none());

        let pruned = tree.retain(|node| node.id != "b");
        let a = pruned.find_by_id("a").unwrap();
        assert_eq!(pruned.node(a).children, Some(Vec::new()));
        assert!(!pruned.node(a).has_children());
    }

    #[test]
    fn test_tooltip() {
        let tree = build_tree(&["a:Alpha:company,b"]).unwrap();
        let a = tree.find_by_id("a").unwrap();
        let b = tree.find_by_id("b").unwrap();
        assert_eq!(tree.node(a).tooltip(), "id: a, name: Alpha, type: company");
        assert_eq!(tree.node(b).tooltip(), "id: b, name: b, type: -");
    }
}
