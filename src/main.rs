use std::io::{self, Write};
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use oztoy::lexer::Lexer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oztoy")]
#[command(about = "Parse a source file and lower it to HIR", long_about = None)]
struct Cli {
    /// Source file
    #[arg(default_value = "test.txt")]
    path: PathBuf,

    /// Print the token stream before parsing
    #[arg(long)]
    tokens: bool,

    /// Print the names left unresolved after lowering
    #[arg(long)]
    unresolved: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let source = std::fs::read_to_string(&cli.path)
        .with_context(|| format!("Error opening file: {}", cli.path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.tokens {
        for token in Lexer::new(&source) {
            writeln!(out, "{}", token)?;
        }
    }

    let mut diagnostics = io::stderr();
    let unit = match oztoy::compile(&source, &mut diagnostics) {
        Ok(unit) => unit,
        Err(error) => {
            tracing::debug!(%error, "compilation failed");
            std::process::exit(1);
        }
    };
    if cli.unresolved {
        unit.print(&mut out)?;
    }
    Ok(())
}
