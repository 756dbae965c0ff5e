mod tree_selector;

pub use tree_selector::{TreeList, TreeSelectorComponent};
