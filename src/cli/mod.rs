pub mod args;
pub mod input;
pub mod tree_json;
