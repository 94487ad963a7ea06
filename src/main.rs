//! Placeholder Engine CLI
//!
//! Usage:
//!   placeholder-engine [OPTIONS] [FILE]
//!
//! Options:
//!   -d, --data <FILE>     TOML data the placeholders resolve against
//!   -c, --config <FILE>   Configuration file (TOML format)
//!   -s, --strict          Fail on unresolved placeholders
//!   -v, --validate        Validate the template instead of rendering it
//!   -k, --known <NAMES>   Known variable names (comma-separated)
//!   -h, --help            Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use placeholder_engine::{Config, Resolver, TemplateValidator, TomlContext};

#[derive(Parser)]
#[command(name = "placeholder-engine")]
#[command(about = "Resolve and validate placeholder templates")]
struct Cli {
    /// Template file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// TOML data the placeholders resolve against
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail on unresolved placeholders instead of substituting the fallback
    #[arg(short, long)]
    strict: bool,

    /// Validate the template instead of rendering it
    #[arg(short, long)]
    validate: bool,

    /// Known variable names; enables undefined-variable warnings.
    /// Defaults to the top-level keys of --data when validating
    #[arg(short, long, value_delimiter = ',')]
    known: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };
    if cli.strict {
        config = config.with_strict_mode(true);
    }

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                process::exit(1);
            }
            (buffer, "<stdin>".to_string())
        }
    };

    let context = match &cli.data {
        Some(path) => match TomlContext::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading data '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => TomlContext::default(),
    };

    if cli.validate {
        // without --known, the data file's top-level keys are the known names
        let known = if cli.known.is_empty() {
            context.keys()
        } else {
            cli.known.clone()
        };
        if !known.is_empty() {
            config = config.with_undefined_check(true);
        }

        let result =
            TemplateValidator::new(&config).validate_with_known(&source, known.as_slice());
        if result.has_errors() || result.has_warnings() {
            eprint!("{}", result.format(&source, &filename));
        }
        if !result.is_valid() {
            process::exit(1);
        }
        println!("valid");
        return;
    }

    match Resolver::new(&config).resolve(&source, &context, &filename, "", "cli") {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"Placeholder Engine - resolve and validate placeholder templates

USAGE:
    placeholder-engine [OPTIONS] [FILE]
    echo 'Hello [name]' | placeholder-engine --data data.toml

OPTIONS:
    -d, --data       TOML data to resolve against
    -c, --config     Configuration file (TOML)
    -s, --strict     Fail on unresolved placeholders
    -v, --validate   Validate instead of rendering
    -k, --known      Known variable names, comma-separated
    -h, --help       Print help

PLACEHOLDERS:
    [name]                 Attribute
    [client->name]         Attribute of a related record
    [formattedAmount()]    Method call
    [formatDate('Y-m-d')]  Method call with arguments

Set RUST_LOG=debug to see fallback substitutions."#
    );
}
