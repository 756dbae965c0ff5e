pub mod components;
pub mod keys;
pub mod utils;

pub use components::{TreeList, TreeSelectorComponent};
pub use keys::{is_printable, matches_key, parse_key};
pub use utils::{truncate_to_width, truncate_to_width_with_ellipsis, visible_width};
