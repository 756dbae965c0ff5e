#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Text,
    Json,
    Rpc,
}

impl Mode {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "rpc" => Some(Self::Rpc),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub rows: Option<String>,
    pub data: Option<String>,
    pub options: Option<String>,
    pub field: Option<String>,
    pub variable: Option<String>,
    pub select: Vec<String>,
    pub search: Option<String>,
    pub show_selected: bool,
    pub expand_all: bool,
    pub mode: Option<Mode>,
    pub print: bool,
    pub help: bool,
    pub version: bool,
    /// Bare arguments, treated as rows
    pub inline_rows: Vec<String>,
}

pub fn parse_args(args: &[String]) -> Args {
    let mut result = Args::default();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();

        match arg {
            "--help" | "-h" => {
                result.help = true;
            }
            "--version" | "-v" => {
                result.version = true;
            }
            "--mode" if i + 1 < args.len() => {
                if let Some(mode) = Mode::parse(&args[i + 1]) {
                    result.mode = Some(mode);
                } else {
                    eprintln!(
                        "Warning: Invalid mode \"{}\". Valid values: text, json, rpc",
                        args[i + 1]
                    );
                }
                i += 1;
            }
            "--print" | "-p" => {
                result.print = true;
            }
            "--rows" if i + 1 < args.len() => {
                result.rows = Some(args[i + 1].clone());
                i += 1;
            }
            "--data" if i + 1 < args.len() => {
                result.data = Some(args[i + 1].clone());
                i += 1;
            }
            "--options" if i + 1 < args.len() => {
                result.options = Some(args[i + 1].clone());
                i += 1;
            }
            "--field" if i + 1 < args.len() => {
                result.field = Some(args[i + 1].clone());
                i += 1;
            }
            "--variable" if i + 1 < args.len() => {
                result.variable = Some(args[i + 1].clone());
                i += 1;
            }
            "--select" | "-s" if i + 1 < args.len() => {
                result.select.extend(
                    args[i + 1]
                        .split(',')
                        .map(|value| value.trim())
                        .filter(|value| !value.is_empty())
                        .map(String::from),
                );
                i += 1;
            }
            "--search" if i + 1 < args.len() => {
                result.search = Some(args[i + 1].clone());
                i += 1;
            }
            "--show-selected" => {
                result.show_selected = true;
            }
            "--expand-all" => {
                result.expand_all = true;
            }
            _ if !arg.starts_with('-') => {
                result.inline_rows.push(arg.to_string());
            }
            _ => {
                eprintln!("Warning: Unknown flag \"{arg}\"");
            }
        }

        i += 1;
    }

    result
}

pub fn print_help() {
    println!(
        "treepanel - hierarchical selector producing dashboard filter expressions

Usage:
  treepanel [options] [row...]

Input:
  --rows <file|->        Newline separated rows (id[:name[:type]],...)
  --data <file>          JSON data frames; rows are read from --field
  --options <file>       Panel options JSON (field, variableName, searchDebounceMs)
  --field <name>         Data field holding the rows
  --variable <name>      Dashboard variable to publish to

Actions:
  --select, -s <ids>     Toggle selection of these ids, in order
  --search <pattern>     Glob search over names (* and ?)
  --show-selected        Show only selected nodes and their ancestors
  --expand-all           Expand every node before printing

Modes:
  --print, -p            Print the tree and filter, then exit
  --mode <mode>          text, json or rpc
  --help, -h             Show this help
  --version, -v          Show version

Environment:
  TREEPANEL_OPTIONS      Default options file
  TREEPANEL_LOG          Log filter (e.g. debug)"
    );
}
