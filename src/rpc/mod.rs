//! JSON lines host protocol.
//!
//! The hosting dashboard writes one command object per line to stdin and
//! reads responses and events from stdout. Filter publications are emitted as
//! `variable_update` events.

use crate::cli::tree_json::serialize_panel_state;
use crate::config::PanelOptions;
use crate::core::dataset::series_from_value;
use crate::core::panel::TreePanel;
use crate::core::selection::InMemoryVariables;
use crate::core::tree::NodeId;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const IDLE_POLL: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
struct RpcSimpleCommand {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RpcSetRowsCommand {
    pub id: Option<String>,
    pub rows: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RpcSetDataCommand {
    pub id: Option<String>,
    pub data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcSetOptionsCommand {
    pub id: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub variable_name: Option<String>,
    #[serde(default)]
    pub search_debounce_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RpcSetVariableCommand {
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub value: String,
}

/// A node is addressed by its id path from the root, or by a bare id
/// (first match depth-first).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcNodeCommand {
    pub id: Option<String>,
    #[serde(default)]
    pub path: Option<Vec<String>>,
    #[serde(default)]
    pub node_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RpcSetSearchTextCommand {
    pub id: Option<String>,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct RpcSetFlagCommand {
    pub id: Option<String>,
    pub enabled: bool,
}

/// Panel plus the host-side view of the dashboard variables.
pub struct RpcSession {
    panel: TreePanel,
    variables: InMemoryVariables,
}

impl RpcSession {
    pub fn new(panel: TreePanel) -> Self {
        Self {
            panel,
            variables: InMemoryVariables::new(),
        }
    }

    pub fn panel(&self) -> &TreePanel {
        &self.panel
    }

    /// Handle one input line. Returns the messages to emit, in order.
    pub fn handle_line(&mut self, line: &str, now: Instant) -> Vec<Value> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        let value: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(err) => {
                return vec![response_error(
                    None,
                    "parse",
                    &format!("Invalid JSON: {err}"),
                )]
            }
        };
        let kind = value
            .get("type")
            .and_then(|value| value.as_str())
            .unwrap_or("")
            .to_string();
        tracing::debug!(command = %kind, "rpc command");

        let mut out = self.handle_command(&kind, value, now);
        // publications happen inside commands; emit them before the response
        let response = out.pop();
        out.extend(self.drain_variable_updates());
        out.extend(response);
        out
    }

    /// Apply a due debounced search. Returns events to emit.
    pub fn tick(&mut self, now: Instant) -> Vec<Value> {
        if self.panel.tick(now) {
            vec![search_applied_event(&self.panel)]
        } else {
            Vec::new()
        }
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.panel.search_deadline()
    }

    fn drain_variable_updates(&mut self) -> Vec<Value> {
        self.variables
            .take_updates()
            .into_iter()
            .map(|(key, value)| {
                json!({
                    "type": "variable_update",
                    "key": key,
                    "value": value,
                })
            })
            .collect()
    }

    fn resolve_node(&self, command: &RpcNodeCommand) -> Option<NodeId> {
        if let Some(path) = command.path.as_ref() {
            return self.panel.find_path(path);
        }
        command
            .node_id
            .as_deref()
            .and_then(|id| self.panel.find_node(id))
    }

    fn handle_command(&mut self, kind: &str, value: Value, now: Instant) -> Vec<Value> {
        match kind {
            "set_rows" => {
                let command: RpcSetRowsCommand = match parse_command(value, kind) {
                    Ok(command) => command,
                    Err(error) => return vec![error],
                };
                let id = command.id.as_deref();
                match self.panel.set_rows(command.rows) {
                    Ok(()) => vec![response_success(
                        id,
                        kind,
                        Some(json!({ "nodeCount": self.panel.tree().len() })),
                    )],
                    Err(err) => vec![response_error(id, kind, &err.to_string())],
                }
            }
            "set_data" => {
                let command: RpcSetDataCommand = match parse_command(value, kind) {
                    Ok(command) => command,
                    Err(error) => return vec![error],
                };
                let id = command.id.as_deref();
                let series = match series_from_value(command.data) {
                    Ok(series) => series,
                    Err(err) => return vec![response_error(id, kind, &err)],
                };
                match self.panel.set_series(series) {
                    Ok(()) => vec![response_success(
                        id,
                        kind,
                        Some(json!({ "nodeCount": self.panel.tree().len() })),
                    )],
                    Err(err) => vec![response_error(id, kind, &err.to_string())],
                }
            }
            "set_options" => {
                let command: RpcSetOptionsCommand = match parse_command(value, kind) {
                    Ok(command) => command,
                    Err(error) => return vec![error],
                };
                let id = command.id.as_deref();
                let current = self.panel.options();
                let mut options = PanelOptions::new(
                    command.field.as_deref().unwrap_or(&current.field),
                    command
                        .variable_name
                        .as_deref()
                        .unwrap_or(&current.variable_name),
                );
                options.search_debounce_ms = command
                    .search_debounce_ms
                    .unwrap_or(current.search_debounce_ms);
                match self.panel.set_options(options) {
                    Ok(()) => vec![response_success(
                        id,
                        kind,
                        Some(json!({ "options": self.panel.options() })),
                    )],
                    Err(err) => vec![response_error(id, kind, &err.to_string())],
                }
            }
            "set_variable" => {
                let command: RpcSetVariableCommand = match parse_command(value, kind) {
                    Ok(command) => command,
                    Err(error) => return vec![error],
                };
                let name = command
                    .name
                    .unwrap_or_else(|| self.panel.options().variable_name.clone());
                self.variables.set(&name, &command.value);
                vec![response_success(command.id.as_deref(), kind, None)]
            }
            "toggle_expand" | "toggle_select" => {
                let command: RpcNodeCommand = match parse_command(value, kind) {
                    Ok(command) => command,
                    Err(error) => return vec![error],
                };
                let id = command.id.as_deref();
                let Some(node) = self.resolve_node(&command) else {
                    return vec![response_error(id, kind, "Node not found")];
                };
                if kind == "toggle_expand" {
                    self.panel.toggle_expand(node);
                    let expanded = self.panel.tree().node(node).expanded;
                    return vec![response_success(
                        id,
                        kind,
                        Some(json!({ "expanded": expanded })),
                    )];
                }
                let update = self.panel.toggle_select(node, &mut self.variables);
                vec![response_success(
                    id,
                    kind,
                    Some(json!({
                        "expression": update.expression,
                        "selectedIds": update.selected_ids,
                        "selectedPaths": update.selected_paths,
                        "published": update.published,
                    })),
                )]
            }
            "expand_all" | "collapse_all" => {
                let command: RpcSimpleCommand = match parse_command(value, kind) {
                    Ok(command) => command,
                    Err(error) => return vec![error],
                };
                if kind == "expand_all" {
                    self.panel.expand_all();
                } else {
                    self.panel.collapse_all();
                }
                vec![response_success(command.id.as_deref(), kind, None)]
            }
            "set_search_text" => {
                let command: RpcSetSearchTextCommand = match parse_command(value, kind) {
                    Ok(command) => command,
                    Err(error) => return vec![error],
                };
                self.panel.set_search_text(&command.text, now);
                vec![response_success(
                    command.id.as_deref(),
                    kind,
                    Some(json!({ "pending": self.panel.search_deadline().is_some() })),
                )]
            }
            "set_show_selected_only" => {
                let command: RpcSetFlagCommand = match parse_command(value, kind) {
                    Ok(command) => command,
                    Err(error) => return vec![error],
                };
                let id = command.id.as_deref();
                match self.panel.set_show_selected_only(command.enabled) {
                    Ok(()) => vec![response_success(
                        id,
                        kind,
                        Some(json!({ "nodeCount": self.panel.tree().len() })),
                    )],
                    Err(err) => vec![response_error(id, kind, &err.to_string())],
                }
            }
            "get_state" => {
                let command: RpcSimpleCommand = match parse_command(value, kind) {
                    Ok(command) => command,
                    Err(error) => return vec![error],
                };
                vec![response_success(
                    command.id.as_deref(),
                    kind,
                    Some(serialize_panel_state(&self.panel)),
                )]
            }
            _ => {
                let id = value.get("id").and_then(Value::as_str);
                vec![response_error(
                    id,
                    kind,
                    &format!("Unknown command: {kind}"),
                )]
            }
        }
    }
}

pub fn run_rpc_mode(panel: TreePanel) -> Result<(), String> {
    let mut session = RpcSession::new(panel);
    let (line_tx, line_rx) = mpsc::channel::<io::Result<String>>();

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        let timeout = session
            .search_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);
        match line_rx.recv_timeout(timeout) {
            Ok(Ok(line)) => {
                for value in session.handle_line(&line, Instant::now()) {
                    emit_json(&value);
                }
            }
            Ok(Err(err)) => return Err(err.to_string()),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        for value in session.tick(Instant::now()) {
            emit_json(&value);
        }
    }
    Ok(())
}

fn parse_command<T: for<'de> Deserialize<'de>>(value: Value, command: &str) -> Result<T, Value> {
    serde_json::from_value(value)
        .map_err(|err| response_error(None, command, &format!("Invalid payload: {err}")))
}

fn search_applied_event(panel: &TreePanel) -> Value {
    json!({
        "type": "search_applied",
        "text": panel.applied_search(),
        "visibleRows": panel.visible_rows().len(),
    })
}

fn response_success(id: Option<&str>, command: &str, data: Option<Value>) -> Value {
    let mut response = json!({
        "type": "response",
        "command": command,
        "success": true,
    });
    if let Some(id) = id {
        response["id"] = json!(id);
    }
    if let Some(data) = data {
        response["data"] = data;
    }
    response
}

fn response_error(id: Option<&str>, command: &str, error: &str) -> Value {
    let mut response = json!({
        "type": "response",
        "command": command,
        "success": false,
        "error": error,
    });
    if let Some(id) = id {
        response["id"] = json!(id);
    }
    response
}

fn emit_json(value: &Value) {
    let output = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    println!("{output}");
    let _ = io::stdout().flush();
}
