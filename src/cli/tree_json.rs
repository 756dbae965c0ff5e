use crate::core::panel::TreePanel;
use crate::core::projection::VisibleRow;
use crate::core::selection::variable_key;
use crate::core::tree::{NodeId, Tree};
use serde_json::{json, Value};

/// Nested JSON for the whole tree, including UI state.
pub fn serialize_tree(tree: &Tree) -> Value {
    Value::Array(
        tree.roots()
            .iter()
            .map(|root| node_value(tree, *root))
            .collect(),
    )
}

fn node_value(tree: &Tree, id: NodeId) -> Value {
    let node = tree.node(id);
    let mut value = json!({
        "id": node.id,
        "name": node.name,
        "type": node.node_type,
        "expanded": node.expanded,
        "selected": node.selected,
        "searchMatch": node.search_match.as_str(),
    });
    if let Some(children) = node.children.as_ref() {
        value["children"] = Value::Array(
            children
                .iter()
                .map(|child| node_value(tree, *child))
                .collect(),
        );
    }
    value
}

pub fn visible_row_value(tree: &Tree, row: &VisibleRow) -> Value {
    let node = tree.node(row.node);
    json!({
        "path": tree.path_ids(row.node),
        "name": node.name,
        "type": node.node_type,
        "depth": row.depth,
        "hasChildren": row.has_children,
        "showsChildren": row.shows_children,
        "selected": node.selected,
        "searchMatch": node.search_match.as_str(),
    })
}

pub fn serialize_panel_state(panel: &TreePanel) -> Value {
    let tree = panel.tree();
    let rows: Vec<Value> = panel
        .visible_rows()
        .iter()
        .map(|row| visible_row_value(tree, row))
        .collect();
    json!({
        "options": panel.options(),
        "variableKey": variable_key(&panel.options().variable_name),
        "expression": panel.expression(),
        "selectedIds": panel.selection().ids(),
        "selectedPaths": panel.selection().paths(),
        "searchText": panel.search_text(),
        "appliedSearch": panel.applied_search(),
        "showSelectedOnly": panel.show_selected_only(),
        "nodeCount": tree.len(),
        "tree": serialize_tree(tree),
        "visibleRows": rows,
    })
}
