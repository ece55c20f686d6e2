mod debug_report;

use speedtags::{Options, parse_speeds_verbose_with};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut failed = false;
    for cell in &config.cells {
        match parse_speeds_verbose_with(cell, &config.options) {
            Ok(details) if config.verbose => debug_report::print_run(cell, &details, config.color),
            Ok(details) => {
                for (key, value) in &details.tags {
                    println!("{key}={value}");
                }
            }
            Err(err) => {
                failed = true;
                if config.verbose {
                    debug_report::print_failure(cell, &err, config.color);
                } else {
                    eprintln!("error: '{cell}': {err}");
                }
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

struct CliConfig {
    cells: Vec<String>,
    options: Options,
    verbose: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut cells: Vec<String> = Vec::new();
    let mut options = Options::default();
    let mut verbose = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("speedtags {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--list-productions" => {
                for name in speedtags::productions() {
                    println!("{name}");
                }
                std::process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "--color" => color = true,
            "--no-color" => color = false,
            "--max-input-len" => {
                let value = args.next().ok_or_else(|| "error: --max-input-len expects a value".to_string())?;
                options.max_input_len = parse_limit("--max-input-len", &value)?;
            }
            "--max-nesting" => {
                let value = args.next().ok_or_else(|| "error: --max-nesting expects a value".to_string())?;
                options.max_nesting = parse_limit("--max-nesting", &value)?;
            }
            "--" => {
                cells.extend(args.by_ref());
                break;
            }
            _ if arg.starts_with("--max-input-len=") => {
                options.max_input_len = parse_limit("--max-input-len", arg.trim_start_matches("--max-input-len="))?;
            }
            _ if arg.starts_with("--max-nesting=") => {
                options.max_nesting = parse_limit("--max-nesting", arg.trim_start_matches("--max-nesting="))?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => cells.push(arg),
        }
    }

    if cells.is_empty() {
        cells = read_stdin_cells()?;
    }

    if cells.is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { cells, options, verbose, color })
}

fn read_stdin_cells() -> Result<Vec<String>, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.lines().map(speedtags::table::normalize_cell).filter(|cell| !cell.is_empty()).collect())
}

fn parse_limit(flag: &str, value: &str) -> Result<usize, String> {
    value.parse().map_err(|_| format!("error: invalid {flag} '{value}' (expected a non-negative integer)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "speedtags {version}

Compile speed-limit table cells into OpenStreetMap tags.

Usage:
  speedtags [OPTIONS] [--] <cell...>
  speedtags [OPTIONS] < cells.txt      (one cell per line)

Options:
  -v, --verbose              Print a per-clause report instead of key=value lines.
  --max-input-len <bytes>    Reject longer cells. Default: {max_input_len}
  --max-nesting <depth>      Reject deeper parenthesis nesting. Default: {max_nesting}
  --list-productions         Print the restriction productions in trial order.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Logging is configured through RUST_LOG (default: warn).

Exit codes:
  0  Every cell compiled.
  1  At least one cell failed to compile.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        max_input_len = Options::default().max_input_len,
        max_nesting = Options::default().max_nesting,
    )
}
