//! Command-line interface for capset
//!
//! Parses input using the stock brace/bracket/paren delimiter families and
//! prints the resulting tree, or checks the input for balance.
//!
//! Usage:
//!   capset parse `<path>` [--format `<format>`] [--strict]  - Parse a file and print the tree
//!   capset check `<path>` [--strict]                       - Report unbalanced delimiters

use clap::{Arg, ArgAction, Command};

use capset::capset::builtins::register_default_pairs;
use capset::capset::snapshot::{render_text, snapshot};
use capset::capset::{Parser, ParserOptions};

fn main() {
    let matches = Command::new("capset")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for capturing paired delimiters in text")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a file and print the captured tree")
                .arg(
                    Arg::new("path")
                        .help("Path to the file to parse")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('json', 'yaml', 'tree')")
                        .default_value("tree"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Fail on unbalanced closes instead of tolerating them")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report unbalanced delimiters in a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the file to check")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Fail on unbalanced closes instead of tolerating them")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            let strict = parse_matches.get_flag("strict");
            handle_parse_command(path, format, strict);
        }
        Some(("check", check_matches)) => {
            let path = check_matches.get_one::<String>("path").unwrap();
            let strict = check_matches.get_flag("strict");
            handle_check_command(path, strict);
        }
        _ => unreachable!(),
    }
}

fn build_parser(strict: bool) -> Parser {
    let mut parser = Parser::with_options(ParserOptions {
        strict,
        ..ParserOptions::default()
    });
    register_default_pairs(&mut parser).unwrap_or_else(|e| {
        eprintln!("Error registering delimiter pairs: {}", e);
        std::process::exit(1);
    });
    parser
}

fn read_input(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

/// Handle the parse command
fn handle_parse_command(path: &str, format: &str, strict: bool) {
    let source = read_input(path);
    let mut parser = build_parser(strict);

    let tree = match parser.parse(&source) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let output = match format {
        "json" => serde_json::to_string_pretty(&snapshot(tree)).unwrap_or_else(|e| {
            eprintln!("Error serializing tree: {}", e);
            std::process::exit(1);
        }),
        "yaml" => serde_yaml::to_string(&snapshot(tree)).unwrap_or_else(|e| {
            eprintln!("Error serializing tree: {}", e);
            std::process::exit(1);
        }),
        "tree" => render_text(tree),
        other => {
            eprintln!(
                "Unknown format '{}'; expected 'json', 'yaml' or 'tree'",
                other
            );
            std::process::exit(1);
        }
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
}

/// Handle the check command
fn handle_check_command(path: &str, strict: bool) {
    let source = read_input(path);
    let mut parser = build_parser(strict);

    if let Err(e) = parser.parse(&source) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let unclosed = parser.unclosed();
    let count = parser.set_count();

    if unclosed.is_empty() && count >= 0 {
        println!("balanced (opens: {})", count);
        return;
    }

    for (kind, id) in &unclosed {
        let span = &parser.tree().node(*id).span;
        println!("unclosed '{}' opened at byte {}", kind, span.start);
    }
    if count < 0 {
        println!("{} close(s) without a matching open", -count);
    }
    std::process::exit(1);
}
