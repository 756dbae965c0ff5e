use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_FIELD: &str = "path";
pub const DEFAULT_VARIABLE_NAME: &str = "filter";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 250;
pub const ENV_OPTIONS_PATH: &str = "TREEPANEL_OPTIONS";
pub const ENV_LOG: &str = "TREEPANEL_LOG";

/// Panel options owned and persisted by the host dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelOptions {
    /// Data field whose values are the delimited rows.
    pub field: String,
    /// Dashboard variable receiving the filter expression.
    pub variable_name: String,
    pub search_debounce_ms: u64,
}

impl PanelOptions {
    pub fn new(field: &str, variable_name: &str) -> Self {
        Self {
            field: normalize_value(field, DEFAULT_FIELD),
            variable_name: normalize_value(variable_name, DEFAULT_VARIABLE_NAME),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Read options from a JSON object, falling back per key.
    pub fn from_json_value(value: &Value) -> Self {
        let field = value.get("field").and_then(Value::as_str).unwrap_or("");
        let variable_name = value
            .get("variableName")
            .and_then(Value::as_str)
            .unwrap_or("");
        let mut options = Self::new(field, variable_name);
        if let Some(ms) = value.get("searchDebounceMs").and_then(Value::as_u64) {
            options.search_debounce_ms = ms;
        }
        options
    }
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD, DEFAULT_VARIABLE_NAME)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, message } => {
                write!(f, "Failed to read options {}: {message}", path.display())
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Invalid options {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load_panel_options(path: &Path) -> Result<PanelOptions, ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| ConfigError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    if !value.is_object() {
        return Err(ConfigError::Parse {
            path: path.to_path_buf(),
            message: "expected a JSON object".to_string(),
        });
    }
    Ok(PanelOptions::from_json_value(&value))
}

/// Options path from `TREEPANEL_OPTIONS`, else `~/.treepanel/options.json`.
pub fn default_options_path() -> PathBuf {
    if let Ok(path) = env::var(ENV_OPTIONS_PATH) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    home_dir().join(".treepanel").join("options.json")
}

/// Load options from `explicit`, or from the default path when it exists.
pub fn resolve_panel_options(explicit: Option<&Path>) -> Result<PanelOptions, ConfigError> {
    if let Some(path) = explicit {
        return load_panel_options(path);
    }
    let path = default_options_path();
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading panel options");
        return load_panel_options(&path);
    }
    Ok(PanelOptions::default())
}

fn normalize_value(value: &str, default_value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default_value.to_string()
    } else {
        trimmed.to_string()
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
