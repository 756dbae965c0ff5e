pub mod dataset;
pub mod debounce;
pub mod node_state;
pub mod panel;
pub mod path_parser;
pub mod projection;
pub mod search;
pub mod selection;
pub mod tree;

pub use dataset::{parse_series, rows_for_field, series_from_value, DataField, DataFrame};
pub use debounce::{Debouncer, DEFAULT_SEARCH_DEBOUNCE};
pub use node_state::{reproject, SelectionStore};
pub use panel::{FilterUpdate, TreePanel};
pub use path_parser::{parse_row, parse_rows, NodeDescriptor};
pub use projection::{
    prune_to_selected, set_all_expanded, shows_children, toggle_expand, visible_rows, VisibleRow,
};
pub use search::{annotate_search, SearchPattern};
pub use selection::{
    filter_expression, publish_filter, selected_nodes, toggle_select, variable_key,
    InMemoryVariables, VariableHost,
};
pub use tree::{
    build_tree, build_tree_from_descriptors, Ancestors, Node, NodeId, SearchMatch, Tree,
    TreeBuildError,
};
