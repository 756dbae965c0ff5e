//! The hierarchy panel: source rows in, annotated tree and filter out.
//!
//! A rebuild runs `build_tree -> reproject -> prune_to_selected ->
//! annotate_search`, each stage taking the tree by value. Interaction
//! handlers mutate the derived tree directly; selection is also written back
//! to the [`SelectionStore`] so it survives the next rebuild.
//!
//! [`NodeId`]s are only valid until the next rebuild.

use crate::config::PanelOptions;
use crate::core::dataset::{rows_for_field, DataFrame};
use crate::core::debounce::Debouncer;
use crate::core::node_state::{reproject, SelectionStore};
use crate::core::projection::{
    prune_to_selected, set_all_expanded, toggle_expand, visible_rows, VisibleRow,
};
use crate::core::search::{annotate_search, SearchPattern};
use crate::core::selection::{
    filter_expression, publish_filter, selected_nodes, toggle_select, VariableHost,
};
use crate::core::tree::{build_tree, NodeId, Tree, TreeBuildError};
use std::time::Instant;

#[derive(Clone, Debug)]
enum RowSource {
    Rows(Vec<String>),
    Series(Vec<DataFrame>),
}

/// Result of a selection toggle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterUpdate {
    pub expression: String,
    pub selected_ids: Vec<String>,
    /// Root-to-node id path of each selected node.
    pub selected_paths: Vec<Vec<String>>,
    /// False when the host already resolved to `expression`.
    pub published: bool,
}

pub struct TreePanel {
    options: PanelOptions,
    source: RowSource,
    /// Rows the current tree was built from.
    built_rows: Option<Vec<String>>,
    store: SelectionStore,
    search: Debouncer<String>,
    search_text: String,
    applied_search: String,
    show_selected_only: bool,
    tree: Tree,
}

impl TreePanel {
    pub fn new(options: PanelOptions) -> Self {
        let search = Debouncer::new(options.search_debounce());
        Self {
            options,
            source: RowSource::Rows(Vec::new()),
            built_rows: None,
            store: SelectionStore::new(),
            search,
            search_text: String::new(),
            applied_search: String::new(),
            show_selected_only: false,
            tree: Tree::new(),
        }
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.store
    }

    /// Search text as typed, possibly not applied yet.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Search text the tree is currently annotated with.
    pub fn applied_search(&self) -> &str {
        &self.applied_search
    }

    pub fn show_selected_only(&self) -> bool {
        self.show_selected_only
    }

    /// Current source rows, after field extraction for data frames.
    pub fn rows(&self) -> Vec<String> {
        match &self.source {
            RowSource::Rows(rows) => rows.clone(),
            RowSource::Series(series) => rows_for_field(series, &self.options.field),
        }
    }

    pub fn set_rows(&mut self, rows: Vec<String>) -> Result<(), TreeBuildError> {
        self.source = RowSource::Rows(rows);
        self.refresh()
    }

    pub fn set_series(&mut self, series: Vec<DataFrame>) -> Result<(), TreeBuildError> {
        self.source = RowSource::Series(series);
        self.refresh()
    }

    /// Replace the options; a different field re-extracts rows.
    pub fn set_options(&mut self, options: PanelOptions) -> Result<(), TreeBuildError> {
        let field_changed = options.field != self.options.field;
        if options.search_debounce_ms != self.options.search_debounce_ms {
            let pending = self.search.flush();
            self.search = Debouncer::new(options.search_debounce());
            if let Some(text) = pending {
                self.search.push(text, Instant::now());
            }
        }
        self.options = options;
        if field_changed {
            self.built_rows = None;
            return self.refresh();
        }
        Ok(())
    }

    pub fn set_show_selected_only(&mut self, flag: bool) -> Result<(), TreeBuildError> {
        if flag == self.show_selected_only {
            return Ok(());
        }
        self.show_selected_only = flag;
        self.rebuild()
    }

    /// Rebuild only if the effective rows differ from the last build.
    fn refresh(&mut self) -> Result<(), TreeBuildError> {
        if self.built_rows.as_ref() == Some(&self.rows()) {
            return Ok(());
        }
        self.rebuild()
    }

    /// Rebuild the tree from the source rows and re-derive all state.
    ///
    /// On a build error the previous tree is kept.
    pub fn rebuild(&mut self) -> Result<(), TreeBuildError> {
        let rows = self.rows();
        let tree = match build_tree(&rows) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!(error = %err, rows = rows.len(), "tree build failed");
                return Err(err);
            }
        };
        let tree = reproject(tree, &self.store);
        let tree = prune_to_selected(tree, self.show_selected_only);
        let pattern = SearchPattern::compile(&self.applied_search);
        self.tree = annotate_search(tree, pattern.as_ref());
        tracing::debug!(
            rows = rows.len(),
            nodes = self.tree.len(),
            show_selected_only = self.show_selected_only,
            "tree rebuilt"
        );
        self.built_rows = Some(rows);
        Ok(())
    }

    pub fn find_node(&self, id: &str) -> Option<NodeId> {
        self.tree.find_by_id(id)
    }

    pub fn find_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        self.tree.find_path(path)
    }

    pub fn toggle_expand(&mut self, id: NodeId) {
        toggle_expand(&mut self.tree, id);
    }

    pub fn expand_all(&mut self) {
        set_all_expanded(&mut self.tree, true);
    }

    pub fn collapse_all(&mut self) {
        set_all_expanded(&mut self.tree, false);
    }

    /// Toggle selection of `id` and publish the new filter to `host`.
    pub fn toggle_select(&mut self, id: NodeId, host: &mut dyn VariableHost) -> FilterUpdate {
        let selected = toggle_select(&mut self.tree, id);
        self.store.sync_from_tree(&self.tree, &selected);
        let expression = filter_expression(&self.tree, &selected);
        let published = publish_filter(host, &self.options.variable_name, &expression);
        FilterUpdate {
            expression,
            selected_ids: self.store.ids(),
            selected_paths: self.store.paths().to_vec(),
            published,
        }
    }

    /// Filter expression for the selection marked on the current tree.
    pub fn expression(&self) -> String {
        filter_expression(&self.tree, &selected_nodes(&self.tree))
    }

    /// Queue a search change; it is applied by [`Self::tick`] once input
    /// has been quiet for the debounce delay.
    pub fn set_search_text(&mut self, text: &str, now: Instant) {
        self.search_text = text.to_string();
        self.search.push(text.to_string(), now);
    }

    /// Apply any due search change. Returns whether the tree changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(text) => self.apply_search(text),
            None => false,
        }
    }

    /// Apply the pending search change immediately.
    pub fn flush_search(&mut self) -> bool {
        match self.search.flush() {
            Some(text) => self.apply_search(text),
            None => false,
        }
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    fn apply_search(&mut self, text: String) -> bool {
        if text == self.applied_search {
            return false;
        }
        let pattern = SearchPattern::compile(&text);
        let tree = std::mem::take(&mut self.tree);
        self.tree = annotate_search(tree, pattern.as_ref());
        tracing::debug!(search = %text, "search applied");
        self.applied_search = text;
        true
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        visible_rows(&self.tree)
    }
}

impl Default for TreePanel {
    fn default() -> Self {
        Self::new(PanelOptions::default())
    }
}
