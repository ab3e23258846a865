// Command-line interface for chatmark
//
// This binary moves chat messages between chat markdown and styled text trees.
//
// The render and serialize commands are the two directions of the transcoder; escape neutralizes
// markdown so a message is shown literally. The inspect command is an internal tool that prints
// what the parser and the renderers make of a message.
//
// Input is read from the given path, or from stdin when the path is omitted or is "-".
// Usage:
//  chatmark render [<input>] [--to json|plain|treeviz]   - Markdown → styled tree
//  chatmark serialize [<input>] [--embed-links] [--no-escape]  - Styled tree (JSON) → markdown
//  chatmark escape [<input>]                             - Escape all markdown in a message
//  chatmark inspect [<input>] [<transform>]              - Execute a transform (defaults to "ast-treeviz")
//  chatmark --list-transforms                            - List available transforms
//
// Configuration is layered: embedded defaults, ./chatmark.toml if present, --config <path>, then
// the command-line flags.

mod transforms;

use chatmark_babel::text::StyledText;
use chatmark_babel::Component;
use chatmark_config::{ChatmarkConfig, ConfigError, Loader};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::fs;
use std::io;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const RENDER_TARGETS: &[&str] = &["json", "plain", "treeviz"];

fn build_cli() -> Command {
    Command::new("chatmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting between chat markdown and styled text")
        .long_about(
            "chatmark is a command-line tool for chat messages.\n\n\
            Commands:\n  \
            - render:    Chat markdown to a styled text tree\n  \
            - serialize: A styled text tree (JSON) to chat markdown\n  \
            - escape:    Escape every markdown marker of a message\n  \
            - inspect:   View internal representations (AST, styled tree)\n\n\
            Examples:\n  \
            chatmark render msg.md                  # Styled tree as JSON\n  \
            echo '**hi**' | chatmark render --to plain\n  \
            chatmark serialize tree.json --embed-links\n  \
            chatmark inspect msg.md tree-treeviz",
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a chatmark.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug events (RUST_LOG takes precedence)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_name("N")
                .help("Nesting limit for parsing, rendering and serializing")
                .value_parser(clap::value_parser!(u32))
                .global(true),
        )
        .subcommand(
            Command::new("render")
                .about("Render chat markdown into a styled text tree")
                .arg(input_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Output representation")
                        .default_value("json")
                        .value_parser(clap::builder::PossibleValuesParser::new(RENDER_TARGETS)),
                )
                .arg(
                    Arg::new("debug-parser")
                        .long("debug-parser")
                        .help("Log every rule match")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("serialize")
                .about("Serialize a styled text tree (JSON) into chat markdown")
                .arg(input_arg())
                .arg(
                    Arg::new("embed-links")
                        .long("embed-links")
                        .help("Write open-url click actions as [text](url)")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-escape")
                        .long("no-escape")
                        .help("Do not escape markdown characters in the text")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("escape")
                .about("Escape all markdown syntax so the message displays literally")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect internal representations of a chat message")
                .arg(input_arg())
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format). Defaults to 'ast-treeviz'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path (stdin when omitted or '-')")
        .required(false)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() {
    let matches = build_cli().get_matches();

    init_tracing(global_flag(&matches, "verbose"));

    if global_flag(&matches, "list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let config = load_cli_config(&matches);

    match matches.subcommand() {
        Some(("render", sub_matches)) => {
            let source = read_input(sub_matches);
            let to = sub_matches
                .get_one::<String>("to")
                .map(|s| s.as_str())
                .unwrap_or("json");
            handle_render_command(&source, to, &config);
        }
        Some(("serialize", sub_matches)) => {
            let source = read_input(sub_matches);
            handle_serialize_command(&source, &config);
        }
        Some(("escape", sub_matches)) => {
            let source = read_input(sub_matches);
            handle_escape_command(&source, &config);
        }
        Some(("inspect", sub_matches)) => {
            let source = read_input(sub_matches);
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            handle_inspect_command(&source, transform, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Global args may be given before or after the subcommand
fn global_flag(matches: &ArgMatches, id: &str) -> bool {
    matches.get_flag(id) || matches.subcommand().is_some_and(|(_, sub)| sub.get_flag(id))
}

fn global_value<'a, T>(matches: &'a ArgMatches, id: &str) -> Option<&'a T>
where
    T: std::any::Any + Clone + Send + Sync + 'static,
{
    matches
        .subcommand()
        .and_then(|(_, sub)| sub.get_one::<T>(id))
        .or_else(|| matches.get_one::<T>(id))
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Reads the message from the input path, or stdin
fn read_input(matches: &ArgMatches) -> String {
    match matches.get_one::<String>("input").map(|s| s.as_str()) {
        None | Some("-") => io::read_to_string(io::stdin()).unwrap_or_else(|e| {
            eprintln!("Error: reading stdin: {e}");
            std::process::exit(1);
        }),
        Some(path) => fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error: reading file '{path}': {e}");
            std::process::exit(1);
        }),
    }
}

/// Drops the single trailing newline editors and `echo` append
fn trim_message(source: &str) -> &str {
    source
        .strip_suffix("\r\n")
        .or_else(|| source.strip_suffix('\n'))
        .unwrap_or(source)
}

/// Handle the render command
fn handle_render_command(source: &str, to: &str, config: &ChatmarkConfig) {
    let tree = transforms::tree_serializer(config)
        .parse(trim_message(source))
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    match to {
        "plain" => println!("{}", tree.plain_text()),
        "treeviz" => print!("{}", chatmark_babel::formats::tree_to_treeviz(&tree)),
        _ => {
            let json = serde_json::to_string_pretty(&tree).unwrap_or_else(|e| {
                eprintln!("Error: JSON serialization failed: {e}");
                std::process::exit(1);
            });
            println!("{json}");
        }
    }
}

/// Handle the serialize command
fn handle_serialize_command(source: &str, config: &ChatmarkConfig) {
    let tree: Component = serde_json::from_str(source).unwrap_or_else(|e| {
        eprintln!("Error: invalid styled text JSON: {e}");
        std::process::exit(1);
    });

    let markdown = transforms::markdown_serializer(config)
        .serialize(&tree)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    println!("{markdown}");
}

/// Handle the escape command
fn handle_escape_command(source: &str, config: &ChatmarkConfig) {
    let escaped = transforms::tree_serializer(config)
        .escape_markdown(trim_message(source))
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    println!("{escaped}");
}

/// Handle the inspect command
fn handle_inspect_command(source: &str, transform: &str, config: &ChatmarkConfig) {
    let output = transforms::execute_transform(trim_message(source), transform, config)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("Stages:");
    println!("  ast         - Parsed markdown nodes (after flattening)");
    println!("  tree        - Styled text tree (after rendering)");
    println!("  escaped     - Escape-mode output\n");

    println!("Formats:");
    println!("  treeviz     - Tree visualization");
    println!("  debug       - Rust debug dump (AST only)");
    println!("  json        - JSON output (tree only)");
    println!("  plain       - Visible text (tree only)");
    println!("  markdown    - Serialized back to markdown (tree only)\n");

    println!("Available transform combinations:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
}

fn load_cli_config(matches: &ArgMatches) -> ChatmarkConfig {
    let loader = Loader::new().with_optional_file("chatmark.toml");
    let loader = if let Some(path) = global_value::<String>(matches, "config") {
        loader.with_file(path)
    } else {
        loader
    };

    apply_cli_overrides(loader, matches)
        .and_then(Loader::build)
        .unwrap_or_else(|err| {
            eprintln!("Error: failed to load configuration: {err}");
            std::process::exit(1);
        })
}

/// Layers the command-line flags over the file configuration
fn apply_cli_overrides(
    mut loader: Loader,
    matches: &ArgMatches,
) -> Result<Loader, ConfigError> {
    if let Some(&depth) = global_value::<u32>(matches, "max-depth") {
        debug!(depth, "max depth set from the command line");
        let depth = i64::from(depth);
        loader = loader
            .set_override("serializer.max_depth", depth)?
            .set_override("renderer.max_depth", depth)?;
    }

    match matches.subcommand() {
        Some(("render", sub)) if sub.get_flag("debug-parser") => {
            loader = loader.set_override("renderer.debug", true)?;
        }
        Some(("serialize", sub)) => {
            if sub.get_flag("embed-links") {
                loader = loader.set_override("serializer.embed_links", true)?;
            }
            if sub.get_flag("no-escape") {
                loader = loader.set_override("serializer.escape_markdown", false)?;
            }
        }
        _ => {}
    }

    Ok(loader)
}
