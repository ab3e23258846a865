use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &[
    "ast-treeviz",
    "ast-debug",
    "tree-treeviz",
    "tree-json",
    "tree-plain",
    "tree-markdown",
    "escaped",
];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path (stdin when omitted or '-')")
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("chatmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting between chat markdown and styled text")
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
                .help("Log debug events")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_name("N")
                .help("Nesting limit for parsing, rendering and serializing")
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
                        .value_parser(["json", "plain", "treeviz"]),
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
                        .help("Transform to apply (stage-format)")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "chatmark", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "chatmark", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "chatmark", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
