use crate::cli::tree_json::serialize_panel_state;
use crate::core::panel::TreePanel;
use crate::core::projection::VisibleRow;
use crate::core::selection::variable_key;
use crate::core::tree::SearchMatch;
use crate::Mode;
use serde_json::Value;
use std::io::{self, Write};

pub fn run_print_mode(mode: Mode, panel: &TreePanel) -> Result<(), String> {
    match mode {
        Mode::Json => {
            emit_json(&serialize_panel_state(panel));
        }
        _ => {
            for line in render_plain(panel) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Plain text rendering: one line per visible row, then the variable line.
pub fn render_plain(panel: &TreePanel) -> Vec<String> {
    let tree = panel.tree();
    let mut lines: Vec<String> = panel
        .visible_rows()
        .iter()
        .map(|row| plain_row(panel, row))
        .collect();
    if tree.is_empty() {
        lines.push("(empty)".to_string());
    }
    lines.push(format!(
        "{}={}",
        variable_key(&panel.options().variable_name),
        panel.expression()
    ));
    lines
}

fn plain_row(panel: &TreePanel, row: &VisibleRow) -> String {
    let node = panel.tree().node(row.node);
    let marker = match (row.has_children, row.shows_children) {
        (false, _) => " ",
        (true, true) => "-",
        (true, false) => "+",
    };
    let checkbox = if node.selected { "[x]" } else { "[ ]" };
    let matched = if node.search_match == SearchMatch::DirectMatch {
        " *"
    } else {
        ""
    };
    format!(
        "{}{marker} {checkbox} {}{matched}",
        "  ".repeat(row.depth),
        node.name
    )
}

fn emit_json(value: &Value) {
    let output = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    println!("{output}");
    let _ = io::stdout().flush();
}
