use crate::cli::args::Args;
use crate::config::{resolve_panel_options, PanelOptions};
use crate::core::dataset::{parse_series, DataFrame};
use crate::core::panel::TreePanel;
use crate::core::selection::VariableHost;
use std::env;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Options file (or defaults) with command line overrides applied.
pub fn resolve_options(args: &Args) -> Result<PanelOptions, String> {
    let explicit = args.options.as_deref().map(resolve_file_arg);
    let mut options =
        resolve_panel_options(explicit.as_deref()).map_err(|err| err.to_string())?;
    if let Some(field) = args.field.as_deref() {
        options.field = field.to_string();
    }
    if let Some(variable) = args.variable.as_deref() {
        options.variable_name = variable.to_string();
    }
    Ok(options)
}

/// Rows from a file, or stdin for `-`. Blank lines are skipped.
pub fn read_rows(source: &str) -> Result<Vec<String>, String> {
    let content = if source == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|err| format!("Could not read rows from stdin: {err}"))?;
        content
    } else {
        let path = resolve_file_arg(source);
        std::fs::read_to_string(&path)
            .map_err(|err| format!("Could not read file {}: {err}", path.display()))?
    };
    Ok(split_rows(&content))
}

pub fn split_rows(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(String::from)
        .collect()
}

pub fn read_series(source: &str) -> Result<Vec<DataFrame>, String> {
    let path = resolve_file_arg(source);
    let content = std::fs::read_to_string(&path)
        .map_err(|err| format!("Could not read file {}: {err}", path.display()))?;
    parse_series(&content)
}

/// Build a panel and load the source named by `args`.
pub fn build_panel(args: &Args) -> Result<TreePanel, String> {
    let options = resolve_options(args)?;
    let mut panel = TreePanel::new(options);
    if let Some(data) = args.data.as_deref() {
        panel
            .set_series(read_series(data)?)
            .map_err(|err| err.to_string())?;
    } else if let Some(rows) = args.rows.as_deref() {
        panel
            .set_rows(read_rows(rows)?)
            .map_err(|err| err.to_string())?;
    } else {
        panel
            .set_rows(args.inline_rows.clone())
            .map_err(|err| err.to_string())?;
    }
    Ok(panel)
}

/// Apply `--select`, `--show-selected`, `--expand-all` and `--search`.
///
/// A selection target is an id (first match depth-first) or an id path
/// joined with `/`.
pub fn apply_actions(
    panel: &mut TreePanel,
    args: &Args,
    host: &mut dyn VariableHost,
) -> Result<(), String> {
    for target in &args.select {
        let node = if target.contains('/') {
            let path: Vec<&str> = target.split('/').collect();
            panel.find_path(&path)
        } else {
            panel.find_node(target)
        };
        let node = node.ok_or_else(|| format!("Node not found: {target}"))?;
        panel.toggle_select(node, host);
    }
    if args.show_selected {
        panel
            .set_show_selected_only(true)
            .map_err(|err| err.to_string())?;
    }
    if args.expand_all {
        panel.expand_all();
    }
    if let Some(search) = args.search.as_deref() {
        panel.set_search_text(search, std::time::Instant::now());
        panel.flush_search();
    }
    Ok(())
}

fn resolve_file_arg(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    Path::new(path).to_path_buf()
}
