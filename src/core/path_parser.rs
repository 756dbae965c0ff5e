//! Row parsing for delimited hierarchy paths.
//!
//! A row is a comma separated list of columns, each column `id`, `id:name`
//! or `id:name:type`. Separators cannot be escaped.

pub const COLUMN_SEPARATOR: char = ',';
pub const PART_SEPARATOR: char = ':';

/// One column of a row, before it is attached to a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub id: String,
    pub name: String,
    pub node_type: Option<String>,
}

impl NodeDescriptor {
    pub fn parse(column: &str) -> Self {
        let mut parts = column.split(PART_SEPARATOR);
        // split always yields at least one part
        let id = parts.next().unwrap_or_default().to_string();
        let name = parts
            .next()
            .map(String::from)
            .unwrap_or_else(|| id.clone());
        let node_type = parts.next().map(String::from);
        Self {
            id,
            name,
            node_type,
        }
    }
}

/// Parse one row into its ordered column descriptors.
///
/// Splitting never produces zero columns: an empty row is a single column
/// with an empty id.
pub fn parse_row(row: &str) -> Vec<NodeDescriptor> {
    row.split(COLUMN_SEPARATOR)
        .map(NodeDescriptor::parse)
        .collect()
}

pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Vec<Vec<NodeDescriptor>> {
    rows.iter().map(|row| parse_row(row.as_ref())).collect()
}
