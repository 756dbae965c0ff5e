//! Hierarchy tree selector component.
//!
//! Provides a navigable view of a [`TreePanel`] with:
//! - Expand/collapse markers (▸, ▾) and selection checkboxes
//! - Debounced glob search over node names
//! - A "show selected only" mode
//! - A footer with the published filter expression

use crate::config::PanelOptions;
use crate::core::panel::{FilterUpdate, TreePanel};
use crate::core::selection::{variable_key, InMemoryVariables};
use crate::core::tree::{NodeId, SearchMatch};
use crate::core::projection::VisibleRow;
use crate::tui::keys::{is_printable, matches_key};
use crate::tui::utils::{truncate_to_width, BOLD, DIM, INVERSE, RESET};
use std::time::Instant;

type CancelCallback = Box<dyn FnMut()>;
type FilterCallback = Box<dyn FnMut(&FilterUpdate)>;

/// Scrollable list of the panel's visible rows with a cursor.
pub struct TreeList {
    panel: TreePanel,
    host: InMemoryVariables,
    /// Visible rows of the current tree
    rows: Vec<VisibleRow>,
    /// Cursor index in `rows`
    cursor: usize,
    /// Maximum visible lines
    max_visible_lines: usize,
    /// Callback when the list is dismissed
    pub on_cancel: Option<CancelCallback>,
    /// Callback after every selection toggle
    pub on_filter: Option<FilterCallback>,
}

impl TreeList {
    pub fn new(panel: TreePanel, max_visible_lines: usize) -> Self {
        let mut list = Self {
            panel,
            host: InMemoryVariables::new(),
            rows: Vec::new(),
            cursor: 0,
            max_visible_lines: max_visible_lines.max(1),
            on_cancel: None,
            on_filter: None,
        };
        list.refresh_rows(None);
        list
    }

    pub fn panel(&self) -> &TreePanel {
        &self.panel
    }

    pub fn host(&self) -> &InMemoryVariables {
        &self.host
    }

    /// Node under the cursor
    pub fn cursor_node(&self) -> Option<NodeId> {
        self.rows.get(self.cursor).map(|row| row.node)
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Recompute visible rows, keeping the cursor on the same node path if
    /// it is still visible.
    fn refresh_rows(&mut self, previous_path: Option<Vec<String>>) {
        self.rows = self.panel.visible_rows();
        if let Some(path) = previous_path {
            let tree = self.panel.tree();
            if let Some(index) = self
                .rows
                .iter()
                .position(|row| tree.path_ids(row.node) == path)
            {
                self.cursor = index;
                return;
            }
        }
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
    }

    fn cursor_path(&self) -> Option<Vec<String>> {
        self.cursor_node()
            .map(|node| self.panel.tree().path_ids(node))
    }

    /// Run `change` against the panel and re-derive the rows.
    fn with_panel(&mut self, change: impl FnOnce(&mut TreePanel, &mut InMemoryVariables)) {
        let path = self.cursor_path();
        change(&mut self.panel, &mut self.host);
        self.refresh_rows(path);
    }

    pub fn toggle_expand_at_cursor(&mut self) {
        if let Some(node) = self.cursor_node() {
            self.with_panel(|panel, _| panel.toggle_expand(node));
        }
    }

    pub fn toggle_select_at_cursor(&mut self) {
        let Some(node) = self.cursor_node() else {
            return;
        };
        let mut update = None;
        self.with_panel(|panel, host| update = Some(panel.toggle_select(node, host)));
        if let (Some(callback), Some(update)) = (&mut self.on_filter, update) {
            callback(&update);
        }
    }

    pub fn set_show_selected_only(&mut self, flag: bool) {
        self.with_panel(|panel, _| {
            if let Err(err) = panel.set_show_selected_only(flag) {
                tracing::warn!(error = %err, "show selected rebuild failed");
            }
        });
    }

    pub fn push_search(&mut self, text: &str, now: Instant) {
        let mut search = self.panel.search_text().to_string();
        search.push_str(text);
        self.panel.set_search_text(&search, now);
    }

    pub fn pop_search(&mut self, now: Instant) {
        let mut search = self.panel.search_text().to_string();
        if search.pop().is_some() {
            self.panel.set_search_text(&search, now);
        }
    }

    /// Apply a due search change. Returns whether the view changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let path = self.cursor_path();
        let changed = self.panel.tick(now);
        if changed {
            self.refresh_rows(path);
        }
        changed
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.panel.search_deadline()
    }

    fn move_left(&mut self) {
        let Some(node) = self.cursor_node() else {
            return;
        };
        let tree = self.panel.tree();
        if tree.node(node).expanded && tree.node(node).has_children() {
            self.with_panel(|panel, _| panel.toggle_expand(node));
            return;
        }
        if let Some(parent) = tree.node(node).parent {
            if let Some(index) = self.rows.iter().position(|row| row.node == parent) {
                self.cursor = index;
            }
        }
    }

    fn move_right(&mut self) {
        let Some(node) = self.cursor_node() else {
            return;
        };
        let tree = self.panel.tree();
        if tree.node(node).has_children() && !tree.node(node).expanded {
            self.with_panel(|panel, _| panel.toggle_expand(node));
        }
    }

    /// Render the list
    pub fn render(&self, width: usize) -> Vec<String> {
        let mut lines = Vec::new();

        if self.rows.is_empty() {
            lines.push(truncate_to_width("  No nodes found", width));
            lines.push(truncate_to_width("  (0/0)", width));
            return lines;
        }

        let start_index = self
            .cursor
            .saturating_sub(self.max_visible_lines / 2)
            .min(self.rows.len().saturating_sub(self.max_visible_lines));
        let end_index = (start_index + self.max_visible_lines).min(self.rows.len());

        for (index, row) in self.rows.iter().enumerate().take(end_index).skip(start_index) {
            lines.push(truncate_to_width(
                &self.render_row(row, index == self.cursor),
                width,
            ));
        }

        lines.push(truncate_to_width(
            &format!("  ({}/{})", self.cursor + 1, self.rows.len()),
            width,
        ));
        lines
    }

    fn render_row(&self, row: &VisibleRow, is_cursor: bool) -> String {
        let node = self.panel.tree().node(row.node);
        let cursor = if is_cursor { "› " } else { "  " };
        let indent = "  ".repeat(row.depth);
        let marker = match (row.has_children, row.shows_children) {
            (false, _) => "  ",
            (true, true) => "▾ ",
            (true, false) => "▸ ",
        };
        let checkbox = if node.selected { "[x] " } else { "[ ] " };
        let name = if node.search_match == SearchMatch::DirectMatch {
            format!("{BOLD}{}{RESET}", node.name)
        } else {
            node.name.clone()
        };
        let line = format!("{cursor}{indent}{marker}{checkbox}{name}");
        if is_cursor {
            format!("{INVERSE}{line}{RESET}")
        } else {
            line
        }
    }

    /// Handle keyboard input
    pub fn handle_input(&mut self, key_data: &str, now: Instant) {
        if matches_key(key_data, "up") {
            if self.cursor == 0 {
                self.cursor = self.rows.len().saturating_sub(1);
            } else {
                self.cursor -= 1;
            }
        } else if matches_key(key_data, "down") {
            if self.cursor >= self.rows.len().saturating_sub(1) {
                self.cursor = 0;
            } else {
                self.cursor += 1;
            }
        } else if matches_key(key_data, "pageup") {
            self.cursor = self.cursor.saturating_sub(self.max_visible_lines);
        } else if matches_key(key_data, "pagedown") {
            self.cursor =
                (self.cursor + self.max_visible_lines).min(self.rows.len().saturating_sub(1));
        } else if matches_key(key_data, "left") {
            self.move_left();
        } else if matches_key(key_data, "right") {
            self.move_right();
        } else if matches_key(key_data, "enter") {
            self.toggle_expand_at_cursor();
        } else if matches_key(key_data, "tab")
            || (matches_key(key_data, "space") && self.panel.search_text().is_empty())
        {
            self.toggle_select_at_cursor();
        } else if matches_key(key_data, "ctrl+e") {
            self.with_panel(|panel, _| panel.expand_all());
        } else if matches_key(key_data, "ctrl+w") {
            self.with_panel(|panel, _| panel.collapse_all());
        } else if matches_key(key_data, "ctrl+s") {
            let flag = !self.panel.show_selected_only();
            self.set_show_selected_only(flag);
        } else if matches_key(key_data, "escape") {
            if !self.panel.search_text().is_empty() {
                self.panel.set_search_text("", now);
                self.with_panel(|panel, _| {
                    panel.flush_search();
                });
            } else if let Some(callback) = &mut self.on_cancel {
                callback();
            }
        } else if matches_key(key_data, "backspace") {
            self.pop_search(now);
        } else if is_printable(key_data) {
            self.push_search(key_data, now);
        }
    }
}

/// Hierarchy selector component
pub struct TreeSelectorComponent {
    tree_list: TreeList,
}

impl TreeSelectorComponent {
    pub fn new(panel: TreePanel, terminal_height: usize) -> Self {
        let max_visible_lines = terminal_height.saturating_sub(10).max(5);
        Self {
            tree_list: TreeList::new(panel, max_visible_lines),
        }
    }

    pub fn on_cancel<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.tree_list.on_cancel = Some(Box::new(callback));
    }

    pub fn on_filter<F>(&mut self, callback: F)
    where
        F: FnMut(&FilterUpdate) + 'static,
    {
        self.tree_list.on_filter = Some(Box::new(callback));
    }

    pub fn tree_list(&self) -> &TreeList {
        &self.tree_list
    }

    pub fn panel(&self) -> &TreePanel {
        self.tree_list.panel()
    }

    pub fn options(&self) -> &PanelOptions {
        self.tree_list.panel().options()
    }

    /// Render the selector
    pub fn render(&self, width: usize) -> Vec<String> {
        let panel = self.tree_list.panel();
        let mut lines = Vec::new();

        lines.push(truncate_to_width(&"─".repeat(width), width));
        lines.push(truncate_to_width("  Hierarchy", width));
        lines.push(truncate_to_width(
            "  ↑/↓: move. ←/→: fold. space: select. ^E/^W: expand/collapse all. ^S: selected only",
            width,
        ));

        let query = panel.search_text();
        if query.is_empty() {
            lines.push(truncate_to_width("  Search:", width));
        } else {
            lines.push(truncate_to_width(&format!("  Search: {query}"), width));
        }
        let show_selected = if panel.show_selected_only() { "[x]" } else { "[ ]" };
        lines.push(truncate_to_width(
            &format!("  {show_selected} Show Selected"),
            width,
        ));

        lines.push(truncate_to_width(&"─".repeat(width), width));
        lines.extend(self.tree_list.render(width));

        if let Some(node) = self.tree_list.cursor_node() {
            lines.push(truncate_to_width(
                &format!("  {DIM}{}{RESET}", panel.tree().node(node).tooltip()),
                width,
            ));
        }

        lines.push(truncate_to_width(&"─".repeat(width), width));
        lines.push(truncate_to_width(
            &format!(
                "  {} = {}",
                variable_key(&panel.options().variable_name),
                panel.expression()
            ),
            width,
        ));

        lines
    }

    pub fn handle_input(&mut self, key_data: &str) {
        self.tree_list.handle_input(key_data, Instant::now());
    }

    pub fn handle_input_at(&mut self, key_data: &str, now: Instant) {
        self.tree_list.handle_input(key_data, now);
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.tree_list.tick(now)
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.tree_list.search_deadline()
    }
}
