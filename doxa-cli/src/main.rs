// Command-line interface for doxa
//
// This binary converts documents between the formats of the doxa-babel crate and checks that
// their event streams are well formed. Every conversion goes through the event stream: the source
// format is parsed into events, and the events are handed to the target format's serializer.
//
// Converting:
//
// The conversion needs a to and from pair. The from is auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  doxa <input> --to <format> [--from <format>] [--output <file>]          - Convert (default)
//  doxa convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above
//  doxa check <input> [--from <format>]                                    - Check nesting
//  doxa --list-formats                                                     - List formats
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the target format.
// Example:
//  doxa notes.md --to markdown --extra-line-ending crlf --extra-list-indent 2

use clap::{Arg, ArgAction, Command, ValueHint};
use doxa_babel::formats::{MarkdownFormat, OutlineFormat};
use doxa_babel::sink::wellformed::check;
use doxa_babel::{Event, FormatRegistry};
use doxa_config::{DoxaConfig, Loader};
use std::collections::HashMap;
use std::fs;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "check", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));
            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("doxa")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert documents through a stream of document events")
        .long_about(
            "doxa converts documents between formats by way of a flat stream of document \
            events.\n\n\
            Commands:\n  \
            - convert: Transform between document formats (default)\n  \
            - check:   Verify that a document's event stream is well formed\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            doxa notes.md --to events                       # Show the event stream\n  \
            doxa notes.md --to markdown -o clean.md         # Re-serialize markdown\n  \
            doxa outline.txt --to markdown                  # Indented lists to markdown\n  \
            doxa check stream.json --from events-json       # Check a stored stream",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a doxa.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr (RUST_LOG takes precedence)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    doxa convert input.md --to events              # Event listing (stdout)\n  \
                    doxa convert input.md --to events-json -o x.json\n  \
                    doxa input.md --to markdown                    # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .long_help(
                            "Target format to convert to.\n\n\
                            Use the format name, not the file extension. \
                            See --list-formats.",
                        )
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Check that a document parses into a well-formed event stream")
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    // If no subcommand is provided, inject "convert"
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_logging(&config, matches.get_flag("verbose"));

    let registry = registry_from_config(&config);

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&registry);
        return;
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                exit_with("input is required");
            };
            let Some(to) = sub_matches.get_one::<String>("to") else {
                exit_with("--to is required");
            };
            let from = resolve_source_format(&registry, input, sub_matches.get_one("from"));
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, input, &from, to, output, &extra_params);
        }
        Some(("check", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                exit_with("input is required");
            };
            let from = resolve_source_format(&registry, input, sub_matches.get_one("from"));
            handle_check_command(&registry, input, &from);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn exit_with(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--verbose`, which wins over the config.
fn init_logging(config: &DoxaConfig, verbose: bool) {
    let fallback = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// The default formats, with the configurable ones rebuilt from the loaded config.
fn registry_from_config(config: &DoxaConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::with_defaults();
    registry.register(MarkdownFormat::new((&config.markdown).into()));
    registry.register(OutlineFormat::new(config.lists.indent_width));
    registry
}

fn resolve_source_format(registry: &FormatRegistry, input: &str, from: Option<&String>) -> String {
    if let Some(from) = from {
        return from.clone();
    }
    match registry.detect_format_from_filename(input) {
        Some(detected) => {
            tracing::debug!(input, format = %detected, "detected source format");
            detected
        }
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }
    }
}

fn read_and_parse(registry: &FormatRegistry, input: &str, from: &str) -> Vec<Event> {
    if let Err(e) = registry.get(from) {
        exit_with(&e.to_string());
    }

    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let events = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    tracing::debug!(input, format = from, events = events.len(), "parsed");
    events
}

fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
) {
    if let Err(e) = registry.get(to) {
        exit_with(&e.to_string());
    }

    let events = read_and_parse(registry, input, from);

    let result = registry
        .serialize_with_options(&events, to, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
            tracing::info!(output = path, "wrote converted document");
        }
        None => print!("{result}"),
    }
}

fn handle_check_command(registry: &FormatRegistry, input: &str, from: &str) {
    let events = read_and_parse(registry, input, from);
    let checker = check(&events);

    if checker.is_complete() {
        println!("{input}: ok ({} events)", events.len());
        return;
    }

    for violation in checker.errors() {
        eprintln!("{input}: {violation}");
    }
    for name in checker.unclosed() {
        eprintln!("{input}: '{name}' is never closed");
    }
    std::process::exit(1);
}

fn handle_list_formats_command(registry: &FormatRegistry) {
    println!("Available formats:\n");
    for name in registry.list_formats() {
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        let direction = match (format.supports_parsing(), format.supports_serialization()) {
            (true, true) => "read/write",
            (true, false) => "read",
            (false, true) => "write",
            (false, false) => "-",
        };
        println!(
            "  {name:<12} {direction:<10} {}  [{}]",
            format.description(),
            format.file_extensions().join(", ")
        );
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> DoxaConfig {
    let loader = Loader::new().with_optional_file("doxa.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}
