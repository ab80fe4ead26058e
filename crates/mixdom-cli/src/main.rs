use clap::{Parser, Subcommand};
use mixdom_parser::{Document, Warning};
use std::path::Path;

#[derive(Parser)]
#[command(name = "mixdom")]
#[command(about = "mixdom: parse and reformat HTML with embedded PHP/Ruby code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file and write it back out, repairing misnested tags
    Print {
        /// Input file
        path: String,

        /// Indent nested elements with tabs
        #[arg(long)]
        pretty: bool,
    },

    /// Check a file for syntax errors and nesting problems
    Check {
        /// Input file
        path: String,

        /// Fail if any nesting problem had to be repaired
        #[arg(long)]
        deny_warnings: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Print { path, pretty } => cmd_print(&path, pretty),
        Command::Check {
            path,
            deny_warnings,
        } => cmd_check(&path, deny_warnings),
    }
}

/// Parse `path`, printing warnings to stderr. Exits on any failure.
fn load(path: &str) -> (Document, Vec<Warning>) {
    let mut warnings: Vec<Warning> = Vec::new();

    let doc = match mixdom_parser::parse_file_with(Path::new(path), &mut warnings) {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            eprintln!("Error: file not found: {path}");
            std::process::exit(1);
        }
        Err(mixdom_parser::ParseError::Syntax(e)) => {
            eprintln!("{path}: {e}");
            eprintln!("{}", e.caret());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    for warning in &warnings {
        eprintln!("{path}: {warning}");
    }

    (doc, warnings)
}

fn cmd_print(path: &str, pretty: bool) {
    let (doc, _) = load(path);

    if pretty {
        print!("{}", doc.pretty_print());
    } else {
        print!("{}", doc.to_text());
    }
}

fn cmd_check(path: &str, deny_warnings: bool) {
    let (_, warnings) = load(path);

    if deny_warnings && !warnings.is_empty() {
        eprintln!("Failed: {path} ({} warnings)", warnings.len());
        std::process::exit(1);
    }

    eprintln!("OK: {path} ({} warnings)", warnings.len());
}
