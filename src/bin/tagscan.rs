//! Command-line interface for tagscan
//! Scans files (or stdin) for a shortcode tag and prints every occurrence, nested ones included.
//!
//! Usage:
//!   tagscan `<path>`... [--tag `<tag>`] [--register `<tag>`]... [--format `<format>`]
//!   tagscan --check `<path>` --tag `<tag>`       - Exit 0 if the tag occurs, 1 otherwise
//!
//! Exit codes: 0 success, 1 no match with --check, 2 input or configuration error.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tagscan::config::Loader;
use tagscan::formats::{self, OutputFormat, SourceReport};
use tagscan::{NestingPolicy, Scanner, TagscanError, VIEW_TAG};
use tracing_subscriber::EnvFilter;

const STDIN_PATH: &str = "-";
/// Picked up from the working directory when no --config is given.
const LOCAL_CONFIG: &str = "tagscan.toml";

fn build_cli() -> Command {
    Command::new("tagscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Find shortcode tags, including nested ones, in text files")
        .arg(
            Arg::new("paths")
                .help("Files to scan ('-' or nothing reads stdin)")
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("tag")
                .long("tag")
                .short('t')
                .help("Tag name to look for")
                .default_value(VIEW_TAG),
        )
        .arg(
            Arg::new("register")
                .long("register")
                .short('r')
                .help("Register an additional tag name (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML configuration file layered over the built-in defaults (default: ./tagscan.toml if present)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: json, yaml, treeviz, count (default from config)"),
        )
        .arg(
            Arg::new("policy")
                .long("policy")
                .help("Placement of tags nested in the target tag")
                .value_parser(["nested", "flattened"]),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Nesting levels searched below the top level")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("compact")
                .long("compact")
                .help("Compact JSON output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Print nothing; exit 0 if the tag was found, 1 otherwise")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (repeatable); RUST_LOG takes precedence")
                .action(ArgAction::Count),
        )
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(found) if matches.get_flag("check") => {
            if found {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Scan every input and print the reports. Returns whether anything matched.
fn run(matches: &ArgMatches) -> Result<bool, TagscanError> {
    let mut loader = match matches.get_one::<PathBuf>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };

    // Flags override whatever the config files say.
    if let Some(max_depth) = matches.get_one::<usize>("max-depth") {
        let max_depth = i64::try_from(*max_depth).unwrap_or(i64::MAX);
        loader = loader.set_override("scan.max_depth", max_depth)?;
    }
    if let Some(policy) = matches.get_one::<String>("policy") {
        policy.parse::<NestingPolicy>()?;
        loader = loader.set_override("scan.nesting_policy", policy.as_str())?;
    }
    if let Some(format) = matches.get_one::<String>("format") {
        format.parse::<OutputFormat>()?;
        loader = loader.set_override("output.format", format.as_str())?;
    }
    if matches.get_flag("compact") {
        loader = loader.set_override("output.pretty", false)?;
    }
    let config = loader.build()?;
    let options = config.scan_options();
    let format = config.output.format;
    let pretty = config.output.pretty;

    let mut registry = config.registry();
    registry.extend(matches.get_many::<String>("register").into_iter().flatten().cloned());

    let tag = matches
        .get_one::<String>("tag")
        .map(String::as_str)
        .unwrap_or(VIEW_TAG);
    let scanner = Scanner::new(&registry).with_options(options);

    let paths: Vec<&String> = matches.get_many::<String>("paths").into_iter().flatten().collect();
    let sources: Vec<&str> = if paths.is_empty() {
        vec![STDIN_PATH]
    } else {
        paths.iter().map(|path| path.as_str()).collect()
    };

    let mut reports = Vec::with_capacity(sources.len());
    for source in sources {
        let content = read_source(source)?;
        let found = scanner.find(&content, tag);
        tracing::info!(source, tag, matches = found.len(), "scanned");
        reports.push(SourceReport::new(source, found));
    }

    let found_any = reports.iter().any(|report| !report.matches.is_empty());
    if !matches.get_flag("check") {
        print!("{}", formats::serialize(&reports, format, pretty)?);
    }
    Ok(found_any)
}

fn read_source(source: &str) -> Result<String, TagscanError> {
    let io_error = |source_error| TagscanError::Io {
        path: PathBuf::from(source),
        source: source_error,
    };

    if source == STDIN_PATH {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(io_error)?;
        Ok(content)
    } else {
        std::fs::read_to_string(Path::new(source)).map_err(io_error)
    }
}
