use std::env;
use std::process;
use treepanel::cli::args::print_help;
use treepanel::cli::input::{apply_actions, build_panel};
use treepanel::logging::init_logging;
use treepanel::modes::{run_interactive_mode, run_print_mode};
use treepanel::rpc::run_rpc_mode;
use treepanel::{parse_args, InMemoryVariables, Mode};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let parsed = parse_args(&args);

    if parsed.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if parsed.help {
        print_help();
        return;
    }

    init_logging();

    let mut panel = match build_panel(&parsed) {
        Ok(panel) => panel,
        Err(message) => {
            eprintln!("Error: {message}");
            process::exit(1);
        }
    };

    let mut variables = InMemoryVariables::new();
    if let Err(message) = apply_actions(&mut panel, &parsed, &mut variables) {
        eprintln!("Error: {message}");
        process::exit(1);
    }

    let is_interactive = !parsed.print && parsed.mode.is_none();
    let mode = parsed.mode.clone().unwrap_or(Mode::Text);

    let result = if matches!(mode, Mode::Rpc) {
        run_rpc_mode(panel)
    } else if is_interactive {
        run_interactive_mode(panel).map(|line| println!("{line}"))
    } else {
        run_print_mode(mode, &panel)
    };

    if let Err(message) = result {
        eprintln!("Error: {message}");
        process::exit(1);
    }
}
