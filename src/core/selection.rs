//! Exclusive selection and filter expression publishing.
//!
//! No selected node may have a selected ancestor or descendant. Siblings and
//! cousins are independent.

use crate::core::tree::{NodeId, Tree};
use std::collections::HashMap;

/// Flip the selection of `id` and clear conflicting selections.
///
/// Returns the full selection afterwards, read from the whole tree in
/// depth-first order.
pub fn toggle_select(tree: &mut Tree, id: NodeId) -> Vec<NodeId> {
    let selected = !tree.node(id).selected;
    tree.node_mut(id).selected = selected;
    if selected {
        let ancestors: Vec<NodeId> = tree.ancestors(id).collect();
        for ancestor in ancestors {
            tree.node_mut(ancestor).selected = false;
        }
        for descendant in tree.descendants(id) {
            tree.node_mut(descendant).selected = false;
        }
    }
    selected_nodes(tree)
}

pub fn selected_nodes(tree: &Tree) -> Vec<NodeId> {
    tree.depth_first()
        .into_iter()
        .filter(|id| tree.node(*id).selected)
        .collect()
}

/// Render `selected` as `type in (id,...)` groups joined by ` OR `.
///
/// Groups appear in first-seen type order, untyped nodes share the empty
/// type. Ids keep the order of `selected`.
pub fn filter_expression(tree: &Tree, selected: &[NodeId]) -> String {
    let mut group_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&str>> = HashMap::new();
    for id in selected {
        let node = tree.node(*id);
        let node_type = node.node_type.as_deref().unwrap_or("");
        let ids = groups.entry(node_type).or_insert_with(|| {
            group_order.push(node_type);
            Vec::new()
        });
        ids.push(node.id.as_str());
    }

    group_order
        .iter()
        .map(|node_type| {
            let ids = groups.get(node_type).map(|ids| ids.join(",")).unwrap_or_default();
            format!("{node_type} in ({ids})")
        })
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Host side of a dashboard variable.
pub trait VariableHost {
    /// Current resolved value of the variable, empty when unset.
    fn resolve_variable(&self, name: &str) -> String;

    /// Publish a new value under `key` (`var-<name>`).
    fn update_variable(&mut self, key: &str, value: &str);
}

pub fn variable_key(name: &str) -> String {
    format!("var-{name}")
}

/// Publish `expression` unless the host already resolves to it.
///
/// Returns whether an update was sent.
pub fn publish_filter(host: &mut dyn VariableHost, variable_name: &str, expression: &str) -> bool {
    if host.resolve_variable(variable_name) == expression {
        tracing::debug!(variable = variable_name, "filter unchanged, skipping publish");
        return false;
    }
    let key = variable_key(variable_name);
    tracing::info!(key = %key, expression, "publishing filter");
    host.update_variable(&key, expression);
    true
}

/// Variable host backed by a map, keyed by variable name.
#[derive(Clone, Debug, Default)]
pub struct InMemoryVariables {
    values: HashMap<String, String>,
    updates: Vec<(String, String)>,
}

impl InMemoryVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value the host currently resolves for `name`.
    pub fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Every update published so far, as `(key, value)`.
    pub fn updates(&self) -> &[(String, String)] {
        &self.updates
    }

    pub fn take_updates(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.updates)
    }
}

impl VariableHost for InMemoryVariables {
    fn resolve_variable(&self, name: &str) -> String {
        self.values.get(name).cloned().unwrap_or_default()
    }

    fn update_variable(&mut self, key: &str, value: &str) {
        let name = key.strip_prefix("var-").unwrap_or(key);
        self.values.insert(name.to_string(), value.to_string());
        self.updates.push((key.to_string(), value.to_string()));
    }
}
