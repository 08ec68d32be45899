use std::{
    io::{self, Read},
    process,
};

use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vslc::{context::CompilationUnit, display_error, errors::errors::Error};

/// Reads a VSL program from stdin and runs it through parsing, simplification
/// and name binding.
#[derive(ClapParser, Debug)]
#[command(name = "vslc", about = "Front end for the VSL teaching language", version)]
struct Cli {
    /// Print the syntax tree as parsed.
    #[arg(short = 't', long = "tree")]
    tree: bool,

    /// Print the syntax tree after constant folding and unreachable-code removal.
    #[arg(short = 'T', long = "simplified-tree")]
    simplified_tree: bool,

    /// Print the symbol tables, the string list and the bound syntax tree.
    #[arg(short = 's', long = "symbols")]
    symbols: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut source = String::new();
    if let Err(error) = io::stdin().read_to_string(&mut source) {
        eprintln!("Error: failed to read the program from stdin: {}", error);
        process::exit(1);
    }

    if source.trim().is_empty() {
        eprintln!("Error: expected a program on stdin");
        process::exit(1);
    }

    if let Err(error) = run(&cli, source.clone()) {
        display_error(&error, &source);
        process::exit(1);
    }
}

fn run(cli: &Cli, source: String) -> Result<(), Error> {
    let mut unit = CompilationUnit::from_source(source, None)?;
    if cli.tree {
        print!("{}", unit.dump_tree());
    }

    unit.simplify()?;
    if cli.simplified_tree {
        print!("{}", unit.dump_tree());
    }

    unit.create_tables()?;
    if cli.symbols {
        if let Some(tables) = unit.dump_tables() {
            print!("{}", tables);
        }
    }

    info!(nodes = unit.tree.live_nodes(), "front end finished");
    Ok(())
}
