pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod modes;
pub mod rpc;
pub mod tui;

pub use cli::args::*;
pub use crate::core::panel::{FilterUpdate, TreePanel};
pub use crate::core::selection::{InMemoryVariables, VariableHost};
pub use crate::core::tree::{build_tree, Node, NodeId, SearchMatch, Tree, TreeBuildError};
