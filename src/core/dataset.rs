//! Host data frames and the row extraction the panel performs on them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataField {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Vec<DataField>,
}

impl DataFrame {
    pub fn field(&self, name: &str) -> Option<&DataField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Rows for `field_name`, taken from the last frame.
///
/// Only the last frame counts: if it lacks the field there are no rows.
/// Non-string values are rendered with their JSON text, nulls are skipped.
pub fn rows_for_field(series: &[DataFrame], field_name: &str) -> Vec<String> {
    let Some(field) = series.last().and_then(|frame| frame.field(field_name)) else {
        return Vec::new();
    };
    field
        .values
        .iter()
        .filter_map(|value| match value {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        })
        .collect()
}

pub fn parse_series(content: &str) -> Result<Vec<DataFrame>, String> {
    let value: Value =
        serde_json::from_str(content).map_err(|err| format!("Invalid data JSON: {err}"))?;
    series_from_value(value)
}

/// Accepts either a list of frames or a single frame object.
pub fn series_from_value(value: Value) -> Result<Vec<DataFrame>, String> {
    match value {
        Value::Array(_) => {
            serde_json::from_value(value).map_err(|err| format!("Invalid data frames: {err}"))
        }
        Value::Object(_) => serde_json::from_value::<DataFrame>(value)
            .map(|frame| vec![frame])
            .map_err(|err| format!("Invalid data frame: {err}")),
        _ => Err("Data must be a frame or a list of frames".to_string()),
    }
}
