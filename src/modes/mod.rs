pub mod interactive;
pub mod print;

pub use interactive::run_interactive_mode;
pub use print::{render_plain, run_print_mode};
